//! Email delivery configuration
//!
//! Provider credentials are optional: whichever providers have complete
//! credentials are placed in the delivery chain, and the logging provider is
//! always appended, so an empty configuration is valid for development.

use secrecy::Secret;
use serde::Deserialize;

/// Default endpoint of the transactional email API
pub const DEFAULT_API_URL: &str = "https://api.brevo.com/v3/smtp/email";

/// Default sender address
pub const DEFAULT_FROM_ADDRESS: &str = "noreply@churchadmin.app";

/// Default sender display name
pub const DEFAULT_FROM_NAME: &str = "Church Admin";

/// Email delivery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Sender address used by every provider
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Sender display name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Request timeout for the HTTP and SMTP clients, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Transactional API settings, present only when an API key is configured
    #[serde(default)]
    pub transactional: Option<TransactionalApiConfig>,

    /// SMTP relay settings, present only when host and credentials are configured
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

/// Transactional email API credentials
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionalApiConfig {
    pub api_key: Secret<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

/// SMTP relay settings
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: String,
    pub password: Secret<String>,
    /// Use STARTTLS; plain connections are only meant for local relays
    #[serde(default = "default_use_tls")]
    pub use_tls: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from_address: default_from_address(),
            from_name: default_from_name(),
            timeout_secs: default_timeout_secs(),
            transactional: None,
            smtp: None,
        }
    }
}

impl EmailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary variable lookup
    ///
    /// Blank values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let transactional = var("EMAIL_API_KEY").map(|api_key| TransactionalApiConfig {
            api_key: Secret::new(api_key),
            api_url: var("EMAIL_API_URL").unwrap_or_else(default_api_url),
        });

        let smtp = match (var("SMTP_HOST"), var("SMTP_USER"), var("SMTP_PASSWORD")) {
            (Some(host), Some(username), Some(password)) => Some(SmtpConfig {
                host,
                port: var("SMTP_PORT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_smtp_port),
                username,
                password: Secret::new(password),
                use_tls: var("SMTP_TLS")
                    .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no" | "off"))
                    .unwrap_or_else(default_use_tls),
            }),
            _ => None,
        };

        Self {
            from_address: var("EMAIL_FROM_ADDRESS").unwrap_or_else(default_from_address),
            from_name: var("EMAIL_FROM_NAME").unwrap_or_else(default_from_name),
            timeout_secs: var("EMAIL_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout_secs),
            transactional,
            smtp,
        }
    }

    /// Whether any real delivery provider is configured
    pub fn has_delivery_credentials(&self) -> bool {
        self.transactional.is_some() || self.smtp.is_some()
    }
}

fn default_from_address() -> String {
    DEFAULT_FROM_ADDRESS.to_string()
}

fn default_from_name() -> String {
    DEFAULT_FROM_NAME.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_use_tls() -> bool {
    true
}
