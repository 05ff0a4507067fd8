//! Transactional Email API Provider
//!
//! Sends email through an HTTP JSON API using the Brevo v3 `smtp/email`
//! request shape. The endpoint is configurable so compatible services and
//! local test servers can be used.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use ca_shared::email::mask_email;
use ca_shared::{EmailConfig, TransactionalApiConfig};

use super::email_provider::{EmailMessage, EmailProvider};
use crate::InfrastructureError;

const USER_AGENT: &str = concat!("ChurchAdmin/", env!("CARGO_PKG_VERSION"));

/// Settings for the transactional API provider
#[derive(Debug, Clone)]
pub struct TransactionalApiSettings {
    /// API key sent in the `api-key` header
    pub api_key: Secret<String>,
    /// Send endpoint
    pub api_url: String,
    /// Sender address
    pub from_address: String,
    /// Sender display name
    pub from_name: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TransactionalApiSettings {
    /// Combine the API credentials with the shared sender settings
    pub fn from_config(email: &EmailConfig, api: &TransactionalApiConfig) -> Self {
        Self {
            api_key: api.api_key.clone(),
            api_url: api.api_url.clone(),
            from_address: email.from_address.clone(),
            from_name: email.from_name.clone(),
            timeout_secs: email.timeout_secs,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEmailAddress<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailBody<'a> {
    sender: ApiEmailAddress<'a>,
    to: Vec<ApiEmailAddress<'a>>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailResponse {
    message_id: Option<String>,
}

/// Email provider backed by a transactional HTTP API
pub struct TransactionalApiProvider {
    client: Client,
    settings: TransactionalApiSettings,
}

impl TransactionalApiProvider {
    /// Create a new provider
    ///
    /// Fails if the API key is blank or the HTTP client cannot be built.
    pub fn new(settings: TransactionalApiSettings) -> Result<Self, InfrastructureError> {
        if settings.api_key.expose_secret().trim().is_empty() {
            return Err(InfrastructureError::Config(
                "Transactional email API key is empty".to_string(),
            ));
        }
        if settings.api_url.trim().is_empty() {
            return Err(InfrastructureError::Config(
                "Transactional email API URL is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        info!(
            provider = "transactional-api",
            api_url = %settings.api_url,
            "Transactional email provider initialized"
        );

        Ok(Self { client, settings })
    }

    fn build_body<'a>(&'a self, message: &'a EmailMessage) -> SendEmailBody<'a> {
        let from_name = Some(self.settings.from_name.as_str()).filter(|name| !name.is_empty());
        SendEmailBody {
            sender: ApiEmailAddress {
                email: &self.settings.from_address,
                name: from_name,
            },
            to: vec![ApiEmailAddress {
                email: &message.to,
                name: None,
            }],
            subject: &message.subject,
            html_content: &message.html,
            text_content: &message.text,
        }
    }
}

#[async_trait]
impl EmailProvider for TransactionalApiProvider {
    async fn send_email(&self, message: &EmailMessage) -> Result<String, InfrastructureError> {
        let masked_email = mask_email(&message.to);
        debug!(
            provider = "transactional-api",
            email = %masked_email,
            "Sending email via transactional API"
        );

        let response = self
            .client
            .post(&self.settings.api_url)
            .header("api-key", self.settings.api_key.expose_secret().as_str())
            .header("Accept", "application/json")
            .json(&self.build_body(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                provider = "transactional-api",
                email = %masked_email,
                status = status.as_u16(),
                "Transactional API rejected email"
            );
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => InfrastructureError::Config(
                    format!("Transactional API rejected credentials (status={})", status),
                ),
                _ => InfrastructureError::Email(format!(
                    "Transactional API send failed (status={}): {}",
                    status, body
                )),
            });
        }

        // A success without a parseable id still counts as delivered
        let message_id = response
            .json::<SendEmailResponse>()
            .await
            .ok()
            .and_then(|r| r.message_id)
            .unwrap_or_else(|| format!("api_{}", uuid::Uuid::new_v4()));

        info!(
            target: "email_service",
            provider = "transactional-api",
            email = %masked_email,
            message_id = %message_id,
            "Email accepted by transactional API"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "transactional-api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(api_key: &str) -> TransactionalApiSettings {
        TransactionalApiSettings {
            api_key: Secret::new(api_key.to_string()),
            api_url: "https://api.example.com/v3/smtp/email".to_string(),
            from_address: "noreply@church.org".to_string(),
            from_name: "Grace Chapel".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        let result = TransactionalApiProvider::new(settings("  "));
        assert!(matches!(result, Err(InfrastructureError::Config(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let provider = TransactionalApiProvider::new(settings("key-123")).unwrap();
        let message = EmailMessage::new("a@b.com", "Hi", "<p>Hi</p>", "Hi");

        let json = serde_json::to_value(provider.build_body(&message)).unwrap();

        assert_eq!(json["sender"]["email"], "noreply@church.org");
        assert_eq!(json["sender"]["name"], "Grace Chapel");
        assert_eq!(json["to"][0]["email"], "a@b.com");
        assert!(json["to"][0].get("name").is_none());
        assert_eq!(json["subject"], "Hi");
        assert_eq!(json["htmlContent"], "<p>Hi</p>");
        assert_eq!(json["textContent"], "Hi");
    }

    #[test]
    fn test_debug_does_not_leak_api_key() {
        let debug = format!("{:?}", settings("super-secret-key"));
        assert!(!debug.contains("super-secret-key"));
    }
}
