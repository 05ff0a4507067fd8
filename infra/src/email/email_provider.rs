//! Email Provider Interface
//!
//! Defines the trait implemented by every delivery backend in the
//! provider chain.

use async_trait::async_trait;

use crate::InfrastructureError;

/// A rendered email addressed to one recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// HTML body
    pub html: String,
    /// Plain-text alternative body
    pub text: String,
}

impl EmailMessage {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        html: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            html: html.into(),
            text: text.into(),
        }
    }
}

/// Email delivery backend
///
/// Implementations include:
/// - Transactional HTTP API
/// - SMTP relay
/// - Logging provider for development
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send a message
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Identifier reported by the backend
    /// * `Err(InfrastructureError)` - If the backend rejected or could not be reached
    async fn send_email(&self, message: &EmailMessage) -> Result<String, InfrastructureError>;

    /// Get the provider name used in logs, e.g. "transactional-api"
    fn provider_name(&self) -> &str;

    /// Check if the provider is available
    ///
    /// The provider chain skips providers that report `false` without
    /// calling `send_email`. Default implementation always returns true.
    async fn is_available(&self) -> bool {
        true
    }
}
