//! Unit tests for the provider chain

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use ca_core::services::verification::EmailServiceTrait;

use crate::email::{EmailMessage, EmailProvider, LoggingEmailProvider, ProviderChain};
use crate::InfrastructureError;

/// Provider with a switchable outcome that counts its calls
struct ScriptedProvider {
    name: &'static str,
    succeed: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    fn new(name: &'static str, succeed: bool) -> (Self, Arc<AtomicBool>, Arc<AtomicUsize>) {
        let succeed = Arc::new(AtomicBool::new(succeed));
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                name,
                succeed: succeed.clone(),
                calls: calls.clone(),
            },
            succeed,
            calls,
        )
    }
}

#[async_trait]
impl EmailProvider for ScriptedProvider {
    async fn send_email(&self, _message: &EmailMessage) -> Result<String, InfrastructureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.succeed.load(Ordering::SeqCst) {
            Ok(format!("{}-id", self.name))
        } else {
            Err(InfrastructureError::Email(format!("{} is down", self.name)))
        }
    }

    fn provider_name(&self) -> &str {
        self.name
    }
}

/// Provider whose send panics instead of returning an error
struct PanickingProvider;

#[async_trait]
impl EmailProvider for PanickingProvider {
    async fn send_email(&self, _message: &EmailMessage) -> Result<String, InfrastructureError> {
        panic!("connection pool poisoned");
    }

    fn provider_name(&self) -> &str {
        "panicking"
    }
}

/// Provider that reports itself unavailable and counts send attempts
struct UnavailableProvider {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl EmailProvider for UnavailableProvider {
    async fn send_email(&self, _message: &EmailMessage) -> Result<String, InfrastructureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("unavailable-id".to_string())
    }

    fn provider_name(&self) -> &str {
        "unavailable"
    }

    async fn is_available(&self) -> bool {
        false
    }
}

fn message() -> EmailMessage {
    EmailMessage::new("a@b.com", "Subject", "<p>Body</p>", "Body")
}

#[tokio::test]
async fn test_primary_success_stays_on_primary() {
    let (primary, _, primary_calls) = ScriptedProvider::new("primary", true);
    let (secondary, _, secondary_calls) = ScriptedProvider::new("secondary", true);
    let chain = ProviderChain::new(vec![Box::new(primary), Box::new(secondary)]);

    assert!(chain.send(&message()).await);
    assert!(chain.send(&message()).await);

    assert_eq!(primary_calls.load(Ordering::SeqCst), 2);
    assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    assert_eq!(chain.current_provider_name().await, "primary");
}

#[tokio::test]
async fn test_sticky_fallback() {
    let (primary, _, primary_calls) = ScriptedProvider::new("primary", false);
    let (secondary, _, secondary_calls) = ScriptedProvider::new("secondary", true);
    let chain = ProviderChain::new(vec![Box::new(primary), Box::new(secondary)]);

    assert!(chain.send(&message()).await);
    assert_eq!(chain.current_provider_name().await, "secondary");

    // Later sends start from the promoted provider
    assert!(chain.send(&message()).await);
    assert!(chain.send(&message()).await);

    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(secondary_calls.load(Ordering::SeqCst), 3);
    assert_eq!(chain.fallback_count().await, 1);
}

#[tokio::test]
async fn test_recovered_primary_is_not_retried() {
    let (primary, primary_up, primary_calls) = ScriptedProvider::new("primary", false);
    let (secondary, _, _) = ScriptedProvider::new("secondary", true);
    let chain = ProviderChain::new(vec![Box::new(primary), Box::new(secondary)]);

    assert!(chain.send(&message()).await);
    primary_up.store(true, Ordering::SeqCst);
    assert!(chain.send(&message()).await);

    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(chain.current_provider_name().await, "secondary");
}

#[tokio::test]
async fn test_fallback_skips_to_first_working_provider() {
    let (first, _, _) = ScriptedProvider::new("first", false);
    let (second, _, second_calls) = ScriptedProvider::new("second", false);
    let (third, _, third_calls) = ScriptedProvider::new("third", true);
    let chain = ProviderChain::new(vec![Box::new(first), Box::new(second), Box::new(third)]);

    assert!(chain.send(&message()).await);

    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    assert_eq!(third_calls.load(Ordering::SeqCst), 1);
    assert_eq!(chain.current_provider_name().await, "third");
}

#[tokio::test]
async fn test_all_providers_fail_returns_false() {
    let (primary, _, primary_calls) = ScriptedProvider::new("primary", false);
    let (secondary, _, secondary_calls) = ScriptedProvider::new("secondary", false);
    let chain = ProviderChain::new(vec![Box::new(primary), Box::new(secondary)]);

    assert!(!chain.send(&message()).await);

    assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    // Nothing succeeded, so nothing was promoted
    assert_eq!(chain.current_provider_name().await, "primary");
    assert_eq!(chain.fallback_count().await, 0);
}

#[tokio::test]
async fn test_failing_current_provider_at_end_of_chain() {
    let (primary, _, _) = ScriptedProvider::new("primary", false);
    let (secondary, secondary_up, _) = ScriptedProvider::new("secondary", true);
    let chain = ProviderChain::new(vec![Box::new(primary), Box::new(secondary)]);

    assert!(chain.send(&message()).await);
    secondary_up.store(false, Ordering::SeqCst);

    assert!(!chain.send(&message()).await);
    assert_eq!(chain.current_provider_name().await, "secondary");
}

#[tokio::test]
async fn test_logging_only_chain_always_succeeds() {
    let chain = ProviderChain::new(vec![Box::new(LoggingEmailProvider::new())]);

    for _ in 0..5 {
        assert!(chain.send_email("a@b.com", "Subject", "<p>Body</p>", "Body").await);
    }
    assert_eq!(chain.len(), 1);
}

#[tokio::test]
async fn test_chain_as_email_service_trait() {
    let (primary, _, _) = ScriptedProvider::new("primary", false);
    let chain = ProviderChain::new(vec![Box::new(primary), Box::new(LoggingEmailProvider::new())]);
    let service: Arc<dyn EmailServiceTrait> = Arc::new(chain);

    assert!(service.send_email("a@b.com", "Subject", "<p>Body</p>", "Body").await);
}

#[tokio::test]
async fn test_concurrent_sends_promote_once() {
    let (primary, _, _) = ScriptedProvider::new("primary", false);
    let (secondary, _, secondary_calls) = ScriptedProvider::new("secondary", true);
    let chain = Arc::new(ProviderChain::new(vec![Box::new(primary), Box::new(secondary)]));

    let mut handles = Vec::new();
    for _ in 0..10 {
        let chain = chain.clone();
        handles.push(tokio::spawn(async move { chain.send(&message()).await }));
    }
    for handle in handles {
        assert!(handle.await.unwrap());
    }

    assert_eq!(secondary_calls.load(Ordering::SeqCst), 10);
    assert_eq!(chain.current_provider_name().await, "secondary");
    assert_eq!(chain.fallback_count().await, 1);
}

#[tokio::test]
async fn test_panicking_provider_falls_back() {
    let chain = ProviderChain::new(vec![
        Box::new(PanickingProvider),
        Box::new(LoggingEmailProvider::new()),
    ]);

    assert!(chain.send(&message()).await);
    assert_eq!(chain.current_provider_name().await, "logging");
    assert_eq!(chain.fallback_count().await, 1);
}

#[tokio::test]
async fn test_panicking_only_provider_returns_false() {
    let chain = ProviderChain::new(vec![Box::new(PanickingProvider)]);

    assert!(!chain.send(&message()).await);
    assert_eq!(chain.current_provider_name().await, "panicking");
}

#[tokio::test]
async fn test_unavailable_provider_is_skipped() {
    let unavailable_calls = Arc::new(AtomicUsize::new(0));
    let unavailable = UnavailableProvider {
        calls: unavailable_calls.clone(),
    };
    let (secondary, _, secondary_calls) = ScriptedProvider::new("secondary", true);
    let chain = ProviderChain::new(vec![Box::new(unavailable), Box::new(secondary)]);

    assert!(chain.send(&message()).await);

    assert_eq!(unavailable_calls.load(Ordering::SeqCst), 0);
    assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    assert_eq!(chain.current_provider_name().await, "secondary");
}
