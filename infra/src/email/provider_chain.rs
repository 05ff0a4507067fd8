//! Email Provider Chain
//!
//! Ordered list of delivery backends with sticky fallback. A send starts at
//! the current provider and walks the providers after it; the first one that
//! accepts the message becomes current for later sends. Provider errors and
//! panics are logged and absorbed here, so callers only see a boolean outcome.

use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use ca_core::services::verification::EmailServiceTrait;
use ca_shared::email::mask_email;

use super::email_provider::{EmailMessage, EmailProvider};
use super::logging_provider::LoggingEmailProvider;

/// State tracking for the chain
#[derive(Debug, Clone, Default)]
struct ChainState {
    /// Index of the provider tried first on the next send
    current: usize,
    /// Number of times the chain moved to a later provider
    fallback_count: u64,
}

/// Email service that falls back through an ordered provider list
pub struct ProviderChain {
    providers: Vec<Box<dyn EmailProvider>>,
    state: Arc<RwLock<ChainState>>,
}

impl ProviderChain {
    /// Create a chain from providers in priority order
    ///
    /// An empty list gets a logging provider so the chain always has a
    /// member to send through.
    pub fn new(mut providers: Vec<Box<dyn EmailProvider>>) -> Self {
        if providers.is_empty() {
            warn!("Provider chain created without providers, using logging provider");
            providers.push(Box::new(LoggingEmailProvider::new()));
        }

        info!(
            providers = ?providers.iter().map(|p| p.provider_name()).collect::<Vec<_>>(),
            "Initialized email provider chain"
        );

        Self {
            providers,
            state: Arc::new(RwLock::new(ChainState::default())),
        }
    }

    /// Name of the provider the next send starts with
    pub async fn current_provider_name(&self) -> String {
        let current = self.state.read().await.current;
        self.providers[current].provider_name().to_string()
    }

    /// Names of all providers in priority order
    pub fn provider_names(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|p| p.provider_name().to_string())
            .collect()
    }

    /// Number of providers in the chain
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Number of times a later provider was promoted to current
    pub async fn fallback_count(&self) -> u64 {
        self.state.read().await.fallback_count
    }

    /// Try one provider, mapping an unavailable provider, an error or a
    /// panic to `None`
    async fn try_provider(&self, index: usize, message: &EmailMessage) -> Option<String> {
        let provider = &self.providers[index];
        if !provider.is_available().await {
            debug!(
                provider = provider.provider_name(),
                "Email provider unavailable, skipping"
            );
            return None;
        }

        match AssertUnwindSafe(provider.send_email(message))
            .catch_unwind()
            .await
        {
            Ok(Ok(message_id)) => Some(message_id),
            Ok(Err(e)) => {
                error!(
                    provider = provider.provider_name(),
                    email = %mask_email(&message.to),
                    error = %e,
                    "Email provider failed"
                );
                None
            }
            Err(panic) => {
                error!(
                    provider = provider.provider_name(),
                    email = %mask_email(&message.to),
                    panic = %panic_message(panic.as_ref()),
                    "Email provider panicked"
                );
                None
            }
        }
    }

    /// Make `index` the current provider if the chain has not already moved
    /// past `from`
    async fn promote(&self, from: usize, index: usize) {
        let mut state = self.state.write().await;
        if state.current != from {
            // Another send already changed the current provider
            return;
        }

        warn!(
            from = self.providers[from].provider_name(),
            to = self.providers[index].provider_name(),
            "Email provider chain switched to fallback provider"
        );
        state.current = index;
        state.fallback_count += 1;
    }

    /// Send a message through the chain
    ///
    /// Returns `true` if some provider accepted it. Never fails.
    pub async fn send(&self, message: &EmailMessage) -> bool {
        let start = self.state.read().await.current;

        for index in start..self.providers.len() {
            if let Some(message_id) = self.try_provider(index, message).await {
                if index != start {
                    self.promote(start, index).await;
                }
                info!(
                    provider = self.providers[index].provider_name(),
                    email = %mask_email(&message.to),
                    message_id = %message_id,
                    "Email sent"
                );
                return true;
            }
        }

        error!(
            email = %mask_email(&message.to),
            providers_tried = self.providers.len() - start,
            "All email providers failed"
        );
        false
    }

    /// Send an email built from its parts
    pub async fn send_email(&self, to: &str, subject: &str, html: &str, text: &str) -> bool {
        self.send(&EmailMessage::new(to, subject, html, text)).await
    }
}

#[async_trait]
impl EmailServiceTrait for ProviderChain {
    async fn send_email(&self, to: &str, subject: &str, html: &str, text: &str) -> bool {
        self.send(&EmailMessage::new(to, subject, html, text)).await
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
