//! SMTP Email Provider
//!
//! Delivers multipart (plain text + HTML) messages through an SMTP relay
//! using `lettre`'s async tokio transport.

use async_trait::async_trait;
use lettre::message::{header, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::{debug, info};

use ca_shared::email::mask_email;
use ca_shared::{EmailConfig, SmtpConfig};

use super::email_provider::{EmailMessage, EmailProvider};
use crate::InfrastructureError;

/// Settings for the SMTP provider
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Secret<String>,
    /// Use STARTTLS; plain connections are only meant for local relays
    pub use_tls: bool,
    pub from_address: String,
    pub from_name: String,
    pub timeout_secs: u64,
}

impl SmtpSettings {
    /// Combine the SMTP credentials with the shared sender settings
    pub fn from_config(email: &EmailConfig, smtp: &SmtpConfig) -> Self {
        Self {
            host: smtp.host.clone(),
            port: smtp.port,
            username: smtp.username.clone(),
            password: smtp.password.clone(),
            use_tls: smtp.use_tls,
            from_address: email.from_address.clone(),
            from_name: email.from_name.clone(),
            timeout_secs: email.timeout_secs,
        }
    }
}

/// Email provider backed by an SMTP relay
pub struct SmtpEmailProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    host: String,
}

impl SmtpEmailProvider {
    /// Create a new provider
    ///
    /// The connection is opened lazily on the first send; construction
    /// fails only for an invalid sender or relay configuration.
    pub fn new(settings: SmtpSettings) -> Result<Self, InfrastructureError> {
        let address = settings
            .from_address
            .parse::<Address>()
            .map_err(|e| InfrastructureError::Config(format!("Invalid sender address: {}", e)))?;
        // Display name is taken verbatim; lettre quotes it when rendering the header
        let name = Some(settings.from_name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let from = Mailbox::new(name, address);

        let credentials = Credentials::new(
            settings.username.clone(),
            settings.password.expose_secret().clone(),
        );

        let builder = if settings.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host).map_err(|e| {
                InfrastructureError::Smtp(format!("Failed to create SMTP transport: {}", e))
            })?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        };

        let transport = builder
            .port(settings.port)
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(settings.timeout_secs)))
            .build();

        info!(
            provider = "smtp",
            host = %settings.host,
            port = settings.port,
            tls = settings.use_tls,
            "SMTP email provider initialized"
        );

        Ok(Self {
            transport,
            from,
            host: settings.host,
        })
    }

    fn build_message(&self, message: &EmailMessage) -> Result<Message, InfrastructureError> {
        let to = message
            .to
            .parse::<Mailbox>()
            .map_err(|e| InfrastructureError::Email(format!("Invalid recipient address: {}", e)))?;

        let body = MultiPart::alternative()
            .singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_PLAIN)
                    .body(message.text.clone()),
            )
            .singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_HTML)
                    .body(message.html.clone()),
            );

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.as_str())
            .multipart(body)
            .map_err(|e| InfrastructureError::Email(format!("Failed to build message: {}", e)))
    }
}

#[async_trait]
impl EmailProvider for SmtpEmailProvider {
    async fn send_email(&self, message: &EmailMessage) -> Result<String, InfrastructureError> {
        let masked_email = mask_email(&message.to);
        debug!(
            provider = "smtp",
            host = %self.host,
            email = %masked_email,
            "Sending email via SMTP"
        );

        let email = self.build_message(message)?;
        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| InfrastructureError::Smtp(format!("Failed to send email: {}", e)))?;

        let message_id = response
            .message()
            .next()
            .map(|line| line.to_string())
            .unwrap_or_else(|| format!("smtp_{}", uuid::Uuid::new_v4()));

        info!(
            target: "email_service",
            provider = "smtp",
            email = %masked_email,
            message_id = %message_id,
            "Email accepted by SMTP relay"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "smtp"
    }
}
