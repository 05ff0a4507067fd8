//! Traits for email delivery, record storage, and time integration

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::verification_record::{VerificationRecord, VerificationType};

/// Trait for email delivery integration
///
/// Delivery failure is an expected outcome and is reported as `false`
/// rather than an error.
#[async_trait]
pub trait EmailServiceTrait: Send + Sync {
    /// Send an email with HTML and plain-text bodies
    async fn send_email(&self, to: &str, subject: &str, html: &str, text: &str) -> bool;
}

/// Trait for verification record persistence
#[async_trait]
pub trait VerificationStoreTrait: Send + Sync {
    /// Persist a newly issued record
    async fn save(&self, record: &VerificationRecord) -> Result<(), String>;

    /// Most recently issued record for an address and purpose
    async fn find_latest(
        &self,
        email: &str,
        verification_type: VerificationType,
    ) -> Result<Option<VerificationRecord>, String>;

    /// Flip a record to used
    ///
    /// Returns `true` only for the call that performed the transition, so a
    /// code can be consumed at most once even under concurrent submissions.
    async fn mark_used(&self, id: Uuid) -> Result<bool, String>;
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
