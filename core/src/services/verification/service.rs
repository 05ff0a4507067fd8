//! Main verification service implementation

use std::sync::Arc;

use ca_shared::email::{is_valid_email, mask_email, normalize_email};

use crate::domain::entities::verification_record::{VerificationRecord, VerificationType};
use crate::domain::value_objects::email_template::TemplateData;
use crate::errors::{DomainError, DomainResult, VerificationFailure};

use super::config::VerificationServiceConfig;
use super::issuer::VerificationIssuer;
use super::traits::{Clock, EmailServiceTrait, SystemClock, VerificationStoreTrait};
use super::types::{SendVerificationResult, VerifyCodeResult};
use super::validator::validate_verification_code;

/// Verification service for issuing and checking email verification codes
pub struct VerificationService<E: EmailServiceTrait, S: VerificationStoreTrait> {
    /// Code issuing and email delivery
    issuer: VerificationIssuer<E>,
    /// Record persistence
    store: Arc<S>,
    /// Time source for issuing and expiry checks
    clock: Arc<dyn Clock>,
}

impl<E: EmailServiceTrait, S: VerificationStoreTrait> VerificationService<E, S> {
    /// Create a new verification service using wall-clock time
    pub fn new(email_service: Arc<E>, store: Arc<S>, config: VerificationServiceConfig) -> Self {
        Self {
            issuer: VerificationIssuer::new(email_service, &config),
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Access the issuer for template rendering or ad-hoc sends
    pub fn issuer(&self) -> &VerificationIssuer<E> {
        &self.issuer
    }

    /// Issue a code for `email`, persist it and email it
    ///
    /// A newer record supersedes older ones for the same address and
    /// purpose, because verification always checks the latest record.
    /// Delivery failure is reported through `delivered: false` so the caller
    /// can offer a resend; only invalid input or storage failure is an error.
    pub async fn send_verification(
        &self,
        email: &str,
        verification_type: VerificationType,
        data: TemplateData,
    ) -> DomainResult<SendVerificationResult> {
        if !is_valid_email(email) {
            return Err(DomainError::Validation {
                message: format!("Invalid email address: {}", mask_email(email)),
            });
        }
        let email = normalize_email(email);

        let now = self.clock.now();
        let verification_data = self.issuer.create_verification_data_at(now);
        let record =
            VerificationRecord::from_data(email.clone(), verification_type, verification_data, now);

        let template_data = data.with_code(record.code.clone());
        let template = self.issuer.get_email_template(verification_type, &template_data)?;

        tracing::info!(
            email = %mask_email(&email),
            verification_type = %verification_type,
            record_id = %record.id,
            event = "verification_code_issued",
            "Issued new verification code"
        );

        self.store.save(&record).await.map_err(|e| {
            tracing::error!(
                email = %mask_email(&email),
                error = %e,
                event = "verification_storage_failed",
                "Failed to store verification record"
            );
            DomainError::Internal {
                message: format!("Failed to store verification record: {}", e),
            }
        })?;

        let delivered = self.issuer.send_verification_email(&email, &template).await;

        Ok(SendVerificationResult { record, delivered })
    }

    /// Check a submitted code for `email` and consume it on success
    ///
    /// Rejections (`already used`, `expired`, `invalid code`, `not found`)
    /// are returned as data. Only storage failures are errors.
    pub async fn verify_code(
        &self,
        email: &str,
        verification_type: VerificationType,
        code: &str,
    ) -> DomainResult<VerifyCodeResult> {
        let email = normalize_email(email);

        let record = self
            .store
            .find_latest(&email, verification_type)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to load verification record: {}", e),
            })?;

        let Some(record) = record else {
            tracing::warn!(
                email = %mask_email(&email),
                verification_type = %verification_type,
                event = "verification_record_missing",
                "No verification record for address"
            );
            return Ok(VerifyCodeResult::failure(VerificationFailure::NotFound));
        };

        let outcome = validate_verification_code(code.trim(), &record, self.clock.now());
        if let Some(reason) = outcome.error {
            tracing::warn!(
                email = %mask_email(&email),
                record_id = %record.id,
                reason = %reason,
                event = "verification_failed",
                "Verification code rejected"
            );
            return Ok(outcome);
        }

        let consumed = self
            .store
            .mark_used(record.id)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to mark verification record as used: {}", e),
            })?;

        if !consumed {
            // A concurrent submission consumed the record first
            return Ok(VerifyCodeResult::failure(VerificationFailure::AlreadyUsed));
        }

        tracing::info!(
            email = %mask_email(&email),
            record_id = %record.id,
            event = "verification_succeeded",
            "Verification code accepted"
        );

        Ok(outcome)
    }
}
