//! Example demonstrating the email verification flow
//!
//! Builds the provider chain from the environment (falling back to the
//! logging provider when no credentials are set), issues a code and checks it.
//!
//! Run with: cargo run --example send_verification_demo -- someone@example.com

use ca_core::domain::entities::verification_record::VerificationType;
use ca_core::domain::value_objects::email_template::TemplateData;
use ca_infra::telemetry::init_tracing;
use ca_shared::{Environment, LoggingConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing(&LoggingConfig::from_env(Environment::from_env()))?;
    let services = ca_infra::initialize().await?;

    let email = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "member@example.com".to_string());

    println!("=== Email Verification Demo ===\n");
    println!("Providers: {:?}", services.email.provider_names());

    let issued = services
        .verification
        .send_verification(
            &email,
            VerificationType::AccountVerification,
            TemplateData::new()
                .with_user_name("Demo Member")
                .with_organization_name("Grace Community Church"),
        )
        .await?;

    println!(
        "Code {} for {} (delivered: {}, expires at {})",
        issued.record.code, issued.record.email, issued.delivered, issued.record.expires_at
    );
    println!("Sent with: {}\n", services.email.current_provider_name().await);

    let result = services
        .verification
        .verify_code(&email, VerificationType::AccountVerification, &issued.record.code)
        .await?;
    println!("First check:  valid={} error={:?}", result.valid, result.error_message());

    let replay = services
        .verification
        .verify_code(&email, VerificationType::AccountVerification, &issued.record.code)
        .await?;
    println!("Second check: valid={} error={:?}", replay.valid, replay.error_message());

    Ok(())
}
