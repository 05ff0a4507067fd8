//! Shared utilities and common types for the ChurchAdmin server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Utility functions (email validation, masking)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, EmailConfig, Environment, LogFormat, LoggingConfig, SmtpConfig,
    TransactionalApiConfig, VerificationConfig,
};
pub use utils::email;
