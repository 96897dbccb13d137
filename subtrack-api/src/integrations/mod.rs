pub mod mock_inbox;

use anyhow::Result;
use shared_types::EmailInput;

pub use mock_inbox::MockInbox;

/// Anything that can hand over emails for subscription discovery.
pub trait EmailSource: Send + Sync {
    fn fetch_emails(&self) -> Result<Vec<EmailInput>>;
}
