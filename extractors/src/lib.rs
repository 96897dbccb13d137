//! Extractors Crate
//!
//! Pattern-based extraction of subscription details from email text. Everything in
//! this crate is synchronous and free of I/O, so a single extractor can be shared
//! across threads and called for any number of emails.
//!
//! # Architecture
//!
//! - **Types**: Input and result types live in the `shared-types` crate
//! - **Implementations**: The provider table, price patterns and billing keywords live here
//!
//! # Example
//!
//! ```rust
//! use extractors::SubscriptionExtractor;
//! use shared_types::EmailInput;
//!
//! let extractor = SubscriptionExtractor::new().unwrap();
//! let input = EmailInput::new(
//!     "Your Netflix subscription - $15.99/month",
//!     "Thank you for your Netflix subscription.",
//!     "netflix@netflix.com",
//! );
//! let result = extractor.parse_email(&input);
//! assert_eq!(result.company, "Netflix");
//! assert_eq!(result.yearly_cost, 191.88);
//! ```

pub mod subscriptions;

pub use subscriptions::{
    classify_billing_cycle, looks_like_subscription, normalize_costs, SubscriptionExtractor,
    PROVIDER_PATTERNS,
};
