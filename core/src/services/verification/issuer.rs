//! Verification code issuing and delivery

use chrono::{DateTime, Utc};
use std::sync::Arc;

use ca_shared::email::mask_email;

use crate::domain::entities::verification_record::{VerificationData, VerificationType};
use crate::domain::value_objects::email_template::{EmailTemplate, TemplateData};
use crate::errors::DomainResult;

use super::config::VerificationServiceConfig;
use super::templates::EmailTemplates;
use super::traits::EmailServiceTrait;

/// Issues one-time codes, renders notification emails and hands them to
/// the delivery service
pub struct VerificationIssuer<E: EmailServiceTrait> {
    email_service: Arc<E>,
    templates: EmailTemplates,
    code_expiration_minutes: i64,
}

impl<E: EmailServiceTrait> VerificationIssuer<E> {
    pub fn new(email_service: Arc<E>, config: &VerificationServiceConfig) -> Self {
        Self {
            email_service,
            templates: EmailTemplates::new(
                config.app_base_url.clone(),
                config.code_expiration_minutes,
            ),
            code_expiration_minutes: config.code_expiration_minutes,
        }
    }

    /// Generate a code expiring after the configured TTL
    pub fn create_verification_data(&self) -> VerificationData {
        self.create_verification_data_at(Utc::now())
    }

    /// Generate a code as if issued at `now`
    pub fn create_verification_data_at(&self, now: DateTime<Utc>) -> VerificationData {
        VerificationData::generate_at(now, self.code_expiration_minutes)
    }

    /// Render the notification email for `verification_type`
    pub fn get_email_template(
        &self,
        verification_type: VerificationType,
        data: &TemplateData,
    ) -> DomainResult<EmailTemplate> {
        self.templates.render(verification_type, data)
    }

    /// Access the underlying template renderer
    pub fn templates(&self) -> &EmailTemplates {
        &self.templates
    }

    /// Deliver a rendered template
    ///
    /// Returns whether some provider accepted the message. Failure is logged
    /// and left for the caller to handle, e.g. by offering a resend.
    pub async fn send_verification_email(&self, email: &str, template: &EmailTemplate) -> bool {
        let delivered = self
            .email_service
            .send_email(email, &template.subject, &template.html, &template.text)
            .await;

        if delivered {
            tracing::info!(
                email = %mask_email(email),
                subject = %template.subject,
                event = "verification_email_sent",
                "Verification email accepted for delivery"
            );
        } else {
            tracing::warn!(
                email = %mask_email(email),
                subject = %template.subject,
                event = "verification_email_failed",
                "Verification email could not be delivered by any provider"
            );
        }

        delivered
    }
}
