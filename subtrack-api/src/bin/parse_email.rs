use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use extractors::SubscriptionExtractor;
use shared_types::EmailInput;
use std::path::{Path, PathBuf};

use subtrack_api::integrations::mock_inbox::parse_raw_email;

#[derive(Parser, Debug)]
#[command(name = "parse-email", about = "Guess a subscription from a single email")]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["eml_path", "body"]),
))]
struct Cli {
    /// Path to a .eml file
    #[arg(long, value_name = "PATH", group = "input")]
    eml_path: Option<PathBuf>,

    /// Raw email body text
    #[arg(long, group = "input")]
    body: Option<String>,

    /// Subject line (used with --body)
    #[arg(long)]
    subject: Option<String>,

    /// Sender address (used with --body)
    #[arg(long)]
    sender: Option<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let input = email_input(cli)?;

    tracing::debug!("Parsing email from {:?}", input.sender);

    let extractor = SubscriptionExtractor::new()?;
    let result = extractor.parse_email(&input);

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn email_input(cli: Cli) -> Result<EmailInput> {
    match (cli.eml_path, cli.body) {
        (Some(path), None) => load_email_from_eml(&path),
        (None, Some(body)) => Ok(EmailInput::new(
            cli.subject.unwrap_or_default(),
            body,
            cli.sender.unwrap_or_default(),
        )),
        _ => anyhow::bail!("Provide exactly one of --eml-path or --body"),
    }
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

fn load_email_from_eml(path: &Path) -> Result<EmailInput> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read .eml file at {:?}", path))?;
    parse_raw_email(&bytes).with_context(|| format!("Failed to parse .eml file at {:?}", path))
}
