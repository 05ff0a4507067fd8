//! Logging Email Provider
//!
//! Terminal member of every provider chain. Messages are written to the log
//! (and optionally the console) instead of being delivered, so flows that
//! send email keep working without credentials.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use ca_shared::email::mask_email;

use super::email_provider::{EmailMessage, EmailProvider};
use crate::InfrastructureError;

/// Email provider that logs instead of delivering
#[derive(Clone)]
pub struct LoggingEmailProvider {
    /// Counter for tracking number of messages logged
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: bool,
    /// Whether to print messages to console
    console_output: bool,
}

impl LoggingEmailProvider {
    /// Create a new logging provider without console output
    pub fn new() -> Self {
        Self::with_options(false, false)
    }

    /// Create a logging provider with configurable options
    pub fn with_options(console_output: bool, simulate_failure: bool) -> Self {
        Self {
            message_count: Arc::new(AtomicU64::new(0)),
            simulate_failure,
            console_output,
        }
    }

    /// Get the total number of messages logged
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Reset the message counter
    pub fn reset_counter(&self) {
        self.message_count.store(0, Ordering::SeqCst);
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&mut self, simulate: bool) {
        self.simulate_failure = simulate;
    }
}

impl Default for LoggingEmailProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailProvider for LoggingEmailProvider {
    async fn send_email(&self, message: &EmailMessage) -> Result<String, InfrastructureError> {
        let masked_email = mask_email(&message.to);

        if self.simulate_failure {
            warn!(
                provider = "logging",
                email = %masked_email,
                "Logging email provider simulating failure"
            );
            return Err(InfrastructureError::Email(
                "Simulated email sending failure".to_string(),
            ));
        }

        let message_id = format!("log_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.console_output {
            // Full content is shown only on the developer console
            println!("\n{}", "=".repeat(60));
            println!("EMAIL (not delivered) - MESSAGE #{}", count);
            println!("{}", "=".repeat(60));
            println!("To: {}", message.to);
            println!("Subject: {}", message.subject);
            println!("Message ID: {}", message_id);
            println!("{}", "-".repeat(60));
            println!("{}", message.text);
            println!("{}\n", "=".repeat(60));
        }

        info!(
            target: "email_service",
            provider = "logging",
            email = %masked_email,
            subject = %message.subject,
            message_id = %message_id,
            count = count,
            "Email logged instead of delivered"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "logging"
    }
}
