use regex::Regex;
use shared_types::{BillingCycle, Currency, ExtractionError};

/// Price pattern families, tried in order. `None` means the currency comes from the
/// second capture group instead of the symbol.
static PRICE_PATTERNS: &[(&str, Option<Currency>)] = &[
    (r"(?i)\$([0-9]+\.?[0-9]*)", Some(Currency::Usd)),
    (r"(?i)€([0-9]+\.?[0-9]*)", Some(Currency::Eur)),
    (r"(?i)£([0-9]+\.?[0-9]*)", Some(Currency::Gbp)),
    (r"(?i)([0-9]+\.?[0-9]*)\s*(USD|EUR|GBP|CAD|AUD)", None),
];

pub(crate) struct PricePattern {
    regex: Regex,
    currency: Option<Currency>,
}

impl PricePattern {
    fn extract(&self, text: &str) -> Option<(f64, Currency)> {
        let captures = self.regex.captures(text)?;

        let amount = captures
            .get(1)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0);

        let currency = match self.currency {
            Some(currency) => currency,
            None => captures
                .get(2)
                .and_then(|m| Currency::from_code(m.as_str()))
                .unwrap_or_default(),
        };

        Some((amount, currency))
    }
}

pub(crate) fn compile_price_patterns() -> Result<Vec<PricePattern>, ExtractionError> {
    PRICE_PATTERNS
        .iter()
        .map(|(pattern, currency)| {
            let regex = Regex::new(pattern).map_err(|e| ExtractionError::InvalidPattern {
                name: format!("price {}", pattern),
                message: e.to_string(),
            })?;
            Ok(PricePattern {
                regex,
                currency: *currency,
            })
        })
        .collect()
}

/// First price found by the first matching family, or `(0.0, USD)` when nothing matches.
pub(crate) fn extract_price(patterns: &[PricePattern], text: &str) -> (f64, Currency) {
    patterns
        .iter()
        .find_map(|pattern| pattern.extract(text))
        .unwrap_or((0.0, Currency::Usd))
}

/// Round to cents on the exact binary value, ties to even.
fn round_cents(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Spread a detected amount over the billing cycle.
///
/// Returns `(monthly_cost, yearly_cost)` rounded to cents. The amount is taken as the
/// price of one cycle; it is never cross-checked against wording like "/year".
pub fn normalize_costs(amount: f64, cycle: BillingCycle) -> (f64, f64) {
    let (monthly, yearly) = match cycle {
        BillingCycle::Monthly => (amount, amount * 12.0),
        BillingCycle::Yearly => (amount / 12.0, amount),
        BillingCycle::Quarterly => (amount / 3.0, amount * 4.0),
    };

    (round_cents(monthly), round_cents(yearly))
}
