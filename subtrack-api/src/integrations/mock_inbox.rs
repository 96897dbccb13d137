use anyhow::{Context, Result};
use mail_parser::MessageParser;
use shared_types::EmailInput;

use crate::integrations::EmailSource;

const NETFLIX_RECEIPT: &str = "From: Netflix <netflix@netflix.com>
To: you@example.com
Subject: Your Netflix subscription - $15.99/month
Content-Type: text/plain; charset=utf-8

Thank you for your Netflix subscription. Your next billing date is...
";

const SPOTIFY_RECEIPT: &str = "From: Spotify <noreply@spotify.com>
To: you@example.com
Subject: Spotify Premium - $9.99 monthly payment
Content-Type: text/plain; charset=utf-8

Your Spotify Premium subscription has been renewed.
";

const AMAZON_PRIME_RECEIPT: &str = "From: Amazon.com <auto-confirm@amazon.com>
To: you@example.com
Subject: Amazon Prime Membership - $139/year
Content-Type: text/plain; charset=utf-8

Your Amazon Prime annual membership renewal.
";

/// Canned inbox standing in for a real mail provider.
pub struct MockInbox {
    messages: Vec<&'static str>,
}

impl MockInbox {
    pub fn new() -> Self {
        Self {
            messages: vec![NETFLIX_RECEIPT, SPOTIFY_RECEIPT, AMAZON_PRIME_RECEIPT],
        }
    }

    pub fn from_messages(messages: Vec<&'static str>) -> Self {
        Self { messages }
    }
}

impl Default for MockInbox {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailSource for MockInbox {
    fn fetch_emails(&self) -> Result<Vec<EmailInput>> {
        self.messages
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                parse_raw_email(raw.as_bytes())
                    .with_context(|| format!("Failed to parse mock email #{}", index))
            })
            .collect()
    }
}

/// Parse an RFC 822 message into subject, first text body and first sender address.
pub fn parse_raw_email(raw: &[u8]) -> Result<EmailInput> {
    let parsed = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| anyhow::anyhow!("Failed to parse email"))?;

    let subject = parsed.subject().map(|s| s.to_string()).unwrap_or_default();
    let sender = parsed
        .from()
        .and_then(|addrs| addrs.first())
        .and_then(|addr| addr.address())
        .map(|a| a.to_string())
        .unwrap_or_default();
    let body = parsed
        .body_text(0)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    Ok(EmailInput {
        subject,
        body,
        sender,
    })
}
