mod billing_cycle;
mod extractor;
mod pricing;

pub use billing_cycle::classify_billing_cycle;
pub use extractor::SubscriptionExtractor;
pub use pricing::normalize_costs;

/// Known providers and the patterns that identify them.
///
/// Order matters: the first provider with a matching pattern wins, so entries are
/// scanned top to bottom and never reordered.
pub static PROVIDER_PATTERNS: &[(&str, &[&str])] = &[
    ("Netflix", &["netflix", "nflx"]),
    ("Spotify", &["spotify"]),
    ("Amazon Prime", &["amazon.*prime", "prime.*video"]),
    ("Disney+", &["disney", "disneyplus"]),
    ("Hulu", &["hulu"]),
    ("Apple", &["apple.*music", "apple.*tv", "icloud"]),
    ("Microsoft", &["microsoft.*365", "office.*365", "xbox"]),
    ("Adobe", &["adobe", "creative.*cloud"]),
    ("YouTube Premium", &["youtube.*premium", "youtube.*red"]),
    ("Dropbox", &["dropbox"]),
    ("GitHub", &["github"]),
    ("LinkedIn", &["linkedin.*premium"]),
    ("Patreon", &["patreon"]),
    ("Twitch", &["twitch.*prime"]),
];

/// Words that usually show up in billing or renewal mail.
pub static SUBSCRIPTION_KEYWORDS: &[&str] = &[
    "subscription",
    "renewal",
    "billing",
    "payment",
    "invoice",
    "recurring",
    "auto-renew",
    "membership",
    "premium",
];

/// Whether the text mentions any subscription keyword, ignoring case.
pub fn looks_like_subscription(text: &str) -> bool {
    let text_lower = text.to_lowercase();
    SUBSCRIPTION_KEYWORDS
        .iter()
        .any(|keyword| text_lower.contains(keyword))
}
