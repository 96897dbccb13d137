use crate::subscriptions::billing_cycle::classify_billing_cycle;
use crate::subscriptions::pricing::{compile_price_patterns, extract_price, PricePattern};
use crate::subscriptions::{normalize_costs, PROVIDER_PATTERNS};
use regex::Regex;
use shared_types::{EmailInput, ExtractedSubscription, ExtractionError, SubscriptionStatus};

pub struct SubscriptionExtractor {
    providers: Vec<CompiledProvider>,
    price_patterns: Vec<PricePattern>,
}

struct CompiledProvider {
    name: String,
    patterns: Vec<Regex>,
}

impl SubscriptionExtractor {
    /// Build an extractor over the built-in provider table.
    pub fn new() -> Result<Self, ExtractionError> {
        Self::from_provider_table(PROVIDER_PATTERNS)
    }

    /// Build an extractor over a custom ordered provider table.
    pub fn from_provider_table(table: &[(&str, &[&str])]) -> Result<Self, ExtractionError> {
        let mut providers = Vec::with_capacity(table.len());

        for (name, patterns) in table {
            let patterns = patterns
                .iter()
                .map(|pattern| {
                    Regex::new(&format!("(?i){}", pattern)).map_err(|e| {
                        ExtractionError::InvalidPattern {
                            name: name.to_string(),
                            message: e.to_string(),
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            providers.push(CompiledProvider {
                name: name.to_string(),
                patterns,
            });
        }

        Ok(Self {
            providers,
            price_patterns: compile_price_patterns()?,
        })
    }

    /// Guess a subscription from one email. Never fails: unmatched parts fall back to
    /// company "Unknown", price 0.0 USD and a monthly cycle.
    pub fn parse_email(&self, input: &EmailInput) -> ExtractedSubscription {
        let text = format!("{} {}", input.subject, input.body);

        let company = self
            .detect_company(&text.to_lowercase())
            .or_else(|| company_from_sender(&input.sender))
            .unwrap_or_else(|| "Unknown".to_string());

        let (amount, currency) = extract_price(&self.price_patterns, &text);
        let billing_cycle = classify_billing_cycle(&text);
        let (monthly_cost, yearly_cost) = normalize_costs(amount, billing_cycle);

        ExtractedSubscription {
            company,
            email: input.sender.clone(),
            monthly_cost,
            yearly_cost,
            currency,
            billing_cycle,
            status: SubscriptionStatus::Active,
        }
    }

    pub fn parse_all(&self, inputs: &[EmailInput]) -> Vec<ExtractedSubscription> {
        inputs.iter().map(|input| self.parse_email(input)).collect()
    }

    /// First provider, in table order, with any matching pattern.
    fn detect_company(&self, text: &str) -> Option<String> {
        self.providers
            .iter()
            .find(|provider| provider.patterns.iter().any(|regex| regex.is_match(text)))
            .map(|provider| provider.name.clone())
    }
}

/// "auto-confirm@amazon.com" becomes "Amazon".
fn company_from_sender(sender: &str) -> Option<String> {
    let domain = sender.split('@').nth(1)?;
    let label = domain.split('.').next().unwrap_or_default();

    let mut chars = label.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect())
}
