//! Unit tests for the verification issuer

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;

use crate::domain::entities::verification_record::{VerificationType, CODE_LENGTH};
use crate::domain::value_objects::email_template::TemplateData;
use crate::services::verification::{VerificationIssuer, VerificationServiceConfig};

use super::mocks::MockEmailService;

#[test]
fn test_create_verification_data_uses_configured_ttl() {
    let config = VerificationServiceConfig {
        code_expiration_minutes: 15,
        ..Default::default()
    };
    let issuer = VerificationIssuer::new(Arc::new(MockEmailService::new(false)), &config);
    let now = Utc.with_ymd_and_hms(2024, 5, 12, 18, 30, 0).unwrap();

    let data = issuer.create_verification_data_at(now);

    assert_eq!(data.code.len(), CODE_LENGTH);
    assert!(data.code.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(data.expires_at, now + Duration::minutes(15));
}

#[test]
fn test_create_verification_data_defaults_to_thirty_minutes() {
    let issuer = VerificationIssuer::new(
        Arc::new(MockEmailService::new(false)),
        &VerificationServiceConfig::default(),
    );

    let before = Utc::now();
    let data = issuer.create_verification_data();

    let ttl = data.expires_at - before;
    assert!(ttl >= Duration::minutes(30));
    assert!(ttl < Duration::minutes(31));
}

#[test]
fn test_templates_use_configured_base_url() {
    let config = VerificationServiceConfig {
        code_expiration_minutes: 30,
        app_base_url: "https://members.gracechapel.org".to_string(),
    };
    let issuer = VerificationIssuer::new(Arc::new(MockEmailService::new(false)), &config);

    let template = issuer
        .get_email_template(VerificationType::Welcome, &TemplateData::new())
        .unwrap();
    assert!(template.text.contains("https://members.gracechapel.org/login"));
}

#[tokio::test]
async fn test_send_verification_email_success() {
    let email_service = Arc::new(MockEmailService::new(false));
    let issuer =
        VerificationIssuer::new(email_service.clone(), &VerificationServiceConfig::default());
    let template = issuer
        .get_email_template(
            VerificationType::AccountVerification,
            &TemplateData::new().with_code("111222"),
        )
        .unwrap();

    let delivered = issuer.send_verification_email("a@b.com", &template).await;

    assert!(delivered);
    let sent = email_service.last_sent().unwrap();
    assert_eq!(sent.to, "a@b.com");
    assert_eq!(sent.subject, template.subject);
    assert_eq!(sent.html, template.html);
    assert_eq!(sent.text, template.text);
}

#[tokio::test]
async fn test_send_verification_email_failure_returns_false() {
    let email_service = Arc::new(MockEmailService::new(true));
    let issuer =
        VerificationIssuer::new(email_service.clone(), &VerificationServiceConfig::default());
    let template = issuer
        .get_email_template(VerificationType::PasswordReset, &TemplateData::new())
        .unwrap();

    let delivered = issuer.send_verification_email("a@b.com", &template).await;

    assert!(!delivered);
    assert_eq!(email_service.sent_count(), 0);
}
