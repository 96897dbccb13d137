use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{BillingCycle, CreateSubscriptionRequest, Currency, SubscriptionStatus};

/// Raw email fields handed to the subscription extractor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmailInput {
    pub subject: String,
    pub body: String,
    /// Expected to hold an `@` address, never validated
    pub sender: String,
}

impl EmailInput {
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            sender: sender.into(),
        }
    }
}

/// Subscription guessed from a single email.
///
/// Exactly one of `monthly_cost` / `yearly_cost` is the detected amount, the other
/// is derived from it through `billing_cycle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExtractedSubscription {
    pub company: String,
    pub email: String,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
    pub currency: Currency,
    pub billing_cycle: BillingCycle,
    pub status: SubscriptionStatus,
}

impl From<&ExtractedSubscription> for CreateSubscriptionRequest {
    fn from(extracted: &ExtractedSubscription) -> Self {
        Self {
            email: Some(extracted.email.clone()),
            monthly_cost: extracted.monthly_cost,
            yearly_cost: extracted.yearly_cost,
            currency: extracted.currency,
            billing_cycle: extracted.billing_cycle,
            status: extracted.status,
            ..CreateSubscriptionRequest::new(extracted.company.clone())
        }
    }
}

/// Extraction error types
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Invalid pattern for {name}: {message}")]
    InvalidPattern { name: String, message: String },
}
