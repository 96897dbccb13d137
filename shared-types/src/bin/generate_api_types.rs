use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Subscription types
    types.push(clean_type(BillingCycle::export_to_string()?));
    types.push(clean_type(Currency::export_to_string()?));
    types.push(clean_type(SubscriptionStatus::export_to_string()?));
    types.push(clean_type(Subscription::export_to_string()?));
    types.push(clean_type(CreateSubscriptionRequest::export_to_string()?));
    types.push(clean_type(UpdateSubscriptionRequest::export_to_string()?));
    types.push(clean_type(SubscriptionsResponse::export_to_string()?));
    types.push(clean_type(SubscriptionStats::export_to_string()?));
    types.push(clean_type(DiscoverSubscriptionsResponse::export_to_string()?));

    // Extraction types
    types.push(clean_type(EmailInput::export_to_string()?));
    types.push(clean_type(ExtractedSubscription::export_to_string()?));

    // Generic responses
    types.push(clean_type(ErrorResponse::export_to_string()?));
    types.push(clean_type(MessageResponse::export_to_string()?));

    let output_dir = Path::new("../frontend/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

/// Strip ts-rs banners and `import type` lines; every type lands in the same file.
fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
