use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod extraction;
pub mod subscription;

pub use extraction::{EmailInput, ExtractedSubscription, ExtractionError};
pub use subscription::{
    BillingCycle, CreateSubscriptionRequest, Currency, DiscoverSubscriptionsResponse,
    Subscription, SubscriptionStats, SubscriptionStatus, SubscriptionsResponse,
    UpdateSubscriptionRequest,
};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct ErrorResponse {
    pub error: String,
}

/// Plain acknowledgement returned by mutating endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct MessageResponse {
    pub message: String,
}
