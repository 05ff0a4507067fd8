//! Email Delivery Module
//!
//! Delivery backends and the provider chain that falls back across them.
//!
//! ## Features
//!
//! - **Email Provider Trait**: Common interface for all delivery backends
//! - **Transactional API**: HTTP JSON API delivery
//! - **SMTP**: Relay delivery with multipart text and HTML bodies
//! - **Logging Provider**: Log-only terminal provider for development
//! - **Provider Chain**: Ordered fallback with sticky promotion

pub mod email_provider;
pub mod logging_provider;
pub mod provider_chain;
pub mod smtp;
pub mod transactional_api;

pub use email_provider::{EmailMessage, EmailProvider};
pub use logging_provider::LoggingEmailProvider;
pub use provider_chain::ProviderChain;
pub use smtp::{SmtpEmailProvider, SmtpSettings};
pub use transactional_api::{TransactionalApiProvider, TransactionalApiSettings};

use ca_shared::{EmailConfig, Environment};

#[cfg(test)]
mod tests;

/// Build the ordered provider list from configuration
///
/// The transactional API comes first when an API key is configured, SMTP
/// next when host and credentials are configured, and the logging provider
/// is always last. A provider that fails to initialize is skipped.
pub fn create_providers(config: &EmailConfig, console_output: bool) -> Vec<Box<dyn EmailProvider>> {
    let mut providers: Vec<Box<dyn EmailProvider>> = Vec::new();

    if let Some(api) = &config.transactional {
        match TransactionalApiProvider::new(TransactionalApiSettings::from_config(config, api)) {
            Ok(provider) => providers.push(Box::new(provider)),
            Err(e) => {
                tracing::warn!(
                    provider = "transactional-api",
                    error = %e,
                    "Failed to initialize transactional email provider, skipping"
                );
            }
        }
    }

    if let Some(smtp) = &config.smtp {
        match SmtpEmailProvider::new(SmtpSettings::from_config(config, smtp)) {
            Ok(provider) => providers.push(Box::new(provider)),
            Err(e) => {
                tracing::warn!(
                    provider = "smtp",
                    error = %e,
                    "Failed to initialize SMTP email provider, skipping"
                );
            }
        }
    }

    if providers.is_empty() {
        tracing::warn!("No email delivery credentials configured, emails will only be logged");
    }

    providers.push(Box::new(LoggingEmailProvider::with_options(console_output, false)));
    providers
}

/// Create the provider chain for an environment
///
/// Outside production the logging provider also prints messages to the
/// console so codes are visible during development.
pub fn create_provider_chain(config: &EmailConfig, environment: Environment) -> ProviderChain {
    ProviderChain::new(create_providers(config, environment.echo_emails()))
}
