//! Verification code configuration

use serde::{Deserialize, Serialize};

/// Settings for issuing verification codes and rendering notification emails
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Minutes a verification code stays valid
    #[serde(default = "default_code_ttl_minutes")]
    pub code_ttl_minutes: i64,

    /// Base application URL used for links inside notification emails
    #[serde(default = "default_app_base_url")]
    pub app_base_url: String,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_minutes: default_code_ttl_minutes(),
            app_base_url: default_app_base_url(),
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let code_ttl_minutes = lookup("VERIFICATION_CODE_TTL_MINUTES")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|minutes| *minutes > 0)
            .unwrap_or_else(default_code_ttl_minutes);

        let app_base_url = lookup("APP_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_app_base_url);

        Self {
            code_ttl_minutes,
            app_base_url,
        }
    }
}

fn default_code_ttl_minutes() -> i64 {
    30
}

fn default_app_base_url() -> String {
    String::from("http://localhost:3000")
}
