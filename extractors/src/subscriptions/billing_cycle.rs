use shared_types::BillingCycle;

/// Keyword families in priority order. Yearly is checked before monthly, so text
/// mentioning both "annual" and "monthly" is yearly.
static CYCLE_KEYWORDS: &[(BillingCycle, &[&str])] = &[
    (
        BillingCycle::Yearly,
        &["yearly", "annual", "per year", "annually"],
    ),
    (
        BillingCycle::Quarterly,
        &["quarterly", "per quarter", "3 months"],
    ),
    (BillingCycle::Monthly, &["monthly", "per month"]),
];

/// Classify the billing cycle by substring keywords, defaulting to monthly.
pub fn classify_billing_cycle(text: &str) -> BillingCycle {
    let text_lower = text.to_lowercase();

    CYCLE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|word| text_lower.contains(word)))
        .map(|(cycle, _)| *cycle)
        .unwrap_or_default()
}
