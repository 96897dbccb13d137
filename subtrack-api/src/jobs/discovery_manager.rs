use crate::database::subscriptions as db;
use crate::database::AsyncDbConnection;
use crate::integrations::EmailSource;
use anyhow::Result;
use extractors::{looks_like_subscription, SubscriptionExtractor};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    /// Newly stored subscriptions
    pub added: usize,
    /// Subscriptions extracted from the inbox, stored or not
    pub total: usize,
}

pub struct DiscoveryManager {
    db_conn: AsyncDbConnection,
    extractor: SubscriptionExtractor,
    source: Arc<dyn EmailSource>,
}

impl DiscoveryManager {
    pub fn new(
        db_conn: AsyncDbConnection,
        extractor: SubscriptionExtractor,
        source: Arc<dyn EmailSource>,
    ) -> Self {
        Self {
            db_conn,
            extractor,
            source,
        }
    }

    /// Extract subscriptions from the inbox and store the ones whose
    /// (company, email) pair is not already known.
    pub async fn discover(&self) -> Result<DiscoveryOutcome> {
        let emails = self.source.fetch_emails()?;
        tracing::info!("Fetched {} emails for subscription discovery", emails.len());

        let discovered: Vec<_> = emails
            .iter()
            .filter(|email| {
                let relevant =
                    looks_like_subscription(&format!("{} {}", email.subject, email.body));
                if !relevant {
                    tracing::debug!("Skipping non-subscription email: {}", email.subject);
                }
                relevant
            })
            .map(|email| self.extractor.parse_email(email))
            .collect();

        let mut added = 0;

        // Checked per insert, so repeats inside this batch are caught too
        for extracted in &discovered {
            match db::insert_extracted_if_absent(self.db_conn.clone(), extracted).await? {
                Some(id) => {
                    tracing::info!(
                        "Discovered subscription: company={}, monthly_cost={}, id={}",
                        extracted.company,
                        extracted.monthly_cost,
                        id
                    );
                    added += 1;
                }
                None => {
                    tracing::debug!(
                        "Subscription already stored: company={}, email={}",
                        extracted.company,
                        extracted.email
                    );
                }
            }
        }

        Ok(DiscoveryOutcome {
            added,
            total: discovered.len(),
        })
    }
}
