//! Configuration module with business-specific sub-modules
//!
//! - `email` - Delivery provider credentials and sender identity
//! - `environment` - Environment detection and logging configuration
//! - `verification` - Verification code lifetime and link base URL

pub mod email;
pub mod environment;
pub mod verification;

// Re-export commonly used types
pub use email::{EmailConfig, SmtpConfig, TransactionalApiConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use verification::VerificationConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Email delivery configuration
    pub email: EmailConfig,

    /// Verification code configuration
    pub verification: VerificationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            email: EmailConfig::default(),
            verification: VerificationConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            email: EmailConfig::from_env(),
            verification: VerificationConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }
}
