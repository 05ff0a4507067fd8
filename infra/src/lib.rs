//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborators the ChurchAdmin
//! verification core depends on.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Email**: delivery providers (transactional API, SMTP, logging) and the
//!   provider chain that falls back across them
//! - **Store**: verification record storage
//! - **Telemetry**: tracing subscriber setup

// Re-export core types for convenience
pub use ca_core::errors::*;

/// Email delivery module - providers and the provider chain
pub mod email;

/// Verification record storage
pub mod store;

/// Tracing initialization
pub mod telemetry;

use std::sync::Arc;

use ca_core::services::verification::{VerificationService, VerificationServiceConfig};
use ca_shared::{AppConfig, Environment};

use email::{create_provider_chain, ProviderChain};
use store::InMemoryVerificationStore;

/// Verification service wired to the provider chain and in-memory store
pub type AppVerificationService = VerificationService<ProviderChain, InMemoryVerificationStore>;

/// Infrastructure service container
#[derive(Clone)]
pub struct InfrastructureServices {
    /// Loaded configuration
    pub config: AppConfig,
    /// Email provider chain shared by every sender
    pub email: Arc<ProviderChain>,
    /// Verification record store
    pub store: Arc<InMemoryVerificationStore>,
    /// Verification workflow
    pub verification: Arc<AppVerificationService>,
}

impl InfrastructureServices {
    /// Wire services from an already loaded configuration
    pub fn from_config(config: AppConfig) -> Self {
        let email = Arc::new(create_provider_chain(&config.email, config.environment));
        let store = Arc::new(InMemoryVerificationStore::new());
        let verification = Arc::new(VerificationService::new(
            email.clone(),
            store.clone(),
            VerificationServiceConfig::from(&config.verification),
        ));

        Self {
            config,
            email,
            store,
            verification,
        }
    }
}

/// Initialize infrastructure services
///
/// This function:
/// - Loads `.env` and the environment configuration
/// - Builds the email provider chain
/// - Creates the verification store and service
///
/// Tracing is left to the caller; see [`telemetry::init_tracing`].
pub async fn initialize() -> Result<InfrastructureServices, InfrastructureError> {
    tracing::info!("Initializing infrastructure services...");

    let config = load_config()?;
    let services = InfrastructureServices::from_config(config);

    tracing::info!(
        environment = %services.config.environment,
        providers = ?services.email.provider_names(),
        "Infrastructure services initialized successfully"
    );

    Ok(services)
}

/// Load application configuration from environment
fn load_config() -> Result<AppConfig, InfrastructureError> {
    // Environment-specific file first; dotenvy never overrides a set variable
    dotenvy::from_filename(Environment::from_env().env_file()).ok();
    dotenvy::dotenv().ok(); // Load .env file if present

    Ok(AppConfig::from_env())
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// SMTP transport error
    #[error("SMTP error: {0}")]
    Smtp(String),

    /// Email provider error
    #[error("Email service error: {0}")]
    Email(String),
}
