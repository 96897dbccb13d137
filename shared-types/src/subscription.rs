use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// Recurrence period of a charge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingCycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Quarterly => "quarterly",
            BillingCycle::Yearly => "yearly",
        }
    }

    /// Unknown values stored by older rows read back as monthly.
    pub fn from_db_str(value: &str) -> Self {
        match value {
            "yearly" => BillingCycle::Yearly,
            "quarterly" => BillingCycle::Quarterly,
            _ => BillingCycle::Monthly,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Cad,
    Aud,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
        }
    }

    /// Parses a three-letter code, ignoring case.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "USD" => Some(Currency::Usd),
            "EUR" => Some(Currency::Eur),
            "GBP" => Some(Currency::Gbp),
            "CAD" => Some(Currency::Cad),
            "AUD" => Some(Currency::Aud),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Active,
    Cancelled,
    Expired,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Expired => "expired",
        }
    }

    pub fn from_db_str(value: &str) -> Self {
        match value {
            "cancelled" => SubscriptionStatus::Cancelled,
            "expired" => SubscriptionStatus::Expired,
            _ => SubscriptionStatus::Active,
        }
    }
}

/// Stored subscription record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Subscription {
    pub id: i64,
    pub company: String,
    pub service_name: Option<String>,
    pub email: Option<String>,
    pub monthly_cost: f64,
    pub yearly_cost: f64,
    pub currency: Currency,
    pub billing_cycle: BillingCycle,
    pub status: SubscriptionStatus,
    pub cancel_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    pub next_billing_date: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateSubscriptionRequest {
    pub company: String,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub monthly_cost: f64,
    #[serde(default)]
    pub yearly_cost: f64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub billing_cycle: BillingCycle,
    #[serde(default)]
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub cancel_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub next_billing_date: Option<i64>,
}

impl CreateSubscriptionRequest {
    pub fn new(company: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            service_name: None,
            email: None,
            monthly_cost: 0.0,
            yearly_cost: 0.0,
            currency: Currency::default(),
            billing_cycle: BillingCycle::default(),
            status: SubscriptionStatus::default(),
            cancel_url: None,
            notes: None,
            next_billing_date: None,
        }
    }
}

/// Partial update. A missing field keeps the stored value; for the nullable
/// fields an explicit `null` clears it (`Some(None)`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateSubscriptionRequest {
    pub company: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub service_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub email: Option<Option<String>>,
    pub monthly_cost: Option<f64>,
    pub yearly_cost: Option<f64>,
    pub currency: Option<Currency>,
    pub billing_cycle: Option<BillingCycle>,
    pub status: Option<SubscriptionStatus>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub cancel_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub next_billing_date: Option<Option<i64>>,
}

/// Keeps a present `null` apart from a missing field: missing stays `None` through
/// `#[serde(default)]`, `null` becomes `Some(None)`.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubscriptionsResponse {
    pub subscriptions: Vec<Subscription>,
}

/// Aggregate costs across every stored subscription, whatever its status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubscriptionStats {
    pub total_subscriptions: i64,
    pub total_monthly_cost: f64,
    pub total_yearly_cost: f64,
    pub estimated_yearly: f64,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscoverSubscriptionsResponse {
    pub message: String,
    pub total: usize,
}
