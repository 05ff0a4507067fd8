//! Integration tests for the email verification workflow

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    use ca_core::domain::entities::verification_record::{VerificationRecord, VerificationType};
    use ca_core::domain::value_objects::email_template::TemplateData;
    use ca_core::services::verification::{
        validate_verification_code, Clock, EmailServiceTrait, VerificationIssuer,
        VerificationService, VerificationServiceConfig, VerificationStoreTrait,
    };

    // Email service that remembers the last code it delivered
    struct CapturingEmailService {
        outbox: Arc<tokio::sync::RwLock<Vec<(String, String)>>>,
    }

    impl CapturingEmailService {
        fn new() -> Self {
            Self {
                outbox: Arc::new(tokio::sync::RwLock::new(Vec::new())),
            }
        }

        async fn last_text(&self) -> Option<String> {
            self.outbox.read().await.last().map(|(_, text)| text.clone())
        }
    }

    #[async_trait]
    impl EmailServiceTrait for CapturingEmailService {
        async fn send_email(&self, to: &str, _subject: &str, _html: &str, text: &str) -> bool {
            self.outbox.write().await.push((to.to_string(), text.to_string()));
            true
        }
    }

    // In-memory record store
    struct MemoryStore {
        records: Arc<tokio::sync::RwLock<Vec<VerificationRecord>>>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                records: Arc::new(tokio::sync::RwLock::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl VerificationStoreTrait for MemoryStore {
        async fn save(&self, record: &VerificationRecord) -> Result<(), String> {
            self.records.write().await.push(record.clone());
            Ok(())
        }

        async fn find_latest(
            &self,
            email: &str,
            verification_type: VerificationType,
        ) -> Result<Option<VerificationRecord>, String> {
            let records = self.records.read().await;
            Ok(records
                .iter()
                .filter(|r| r.belongs_to(email, verification_type))
                .max_by_key(|r| r.created_at)
                .cloned())
        }

        async fn mark_used(&self, id: Uuid) -> Result<bool, String> {
            let mut records = self.records.write().await;
            match records.iter_mut().find(|r| r.id == id) {
                Some(record) if !record.is_used => {
                    record.mark_as_used();
                    Ok(true)
                }
                Some(_) => Ok(false),
                None => Err("record not found".to_string()),
            }
        }
    }

    struct TestClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl TestClock {
        fn new(now: DateTime<Utc>) -> Self {
            Self { now: Mutex::new(now) }
        }

        fn advance(&self, duration: Duration) {
            let mut now = self.now.lock().unwrap();
            *now = *now + duration;
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn extract_code(text: &str) -> String {
        let marker = "VERIFICATION CODE: ";
        let start = text.find(marker).expect("code in email") + marker.len();
        text[start..start + 6].to_string()
    }

    #[test]
    fn test_issue_then_validate_record_directly() {
        let config = VerificationServiceConfig::default();
        let issuer = VerificationIssuer::new(Arc::new(CapturingEmailService::new()), &config);
        let issued_at = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap();

        let data = issuer.create_verification_data_at(issued_at);
        let mut record = VerificationRecord::from_data(
            "a@b.com".to_string(),
            VerificationType::AccountVerification,
            data.clone(),
            issued_at,
        );

        let first =
            validate_verification_code(&data.code, &record, issued_at + Duration::minutes(1));
        assert!(first.valid);

        record.mark_as_used();
        let second =
            validate_verification_code(&data.code, &record, issued_at + Duration::minutes(2));
        assert_eq!(second.error_message().as_deref(), Some("already used"));

        let fresh = VerificationRecord::from_data(
            "a@b.com".to_string(),
            VerificationType::AccountVerification,
            data.clone(),
            issued_at,
        );
        let late =
            validate_verification_code(&data.code, &fresh, issued_at + Duration::minutes(31));
        assert_eq!(late.error_message().as_deref(), Some("expired"));
    }

    #[tokio::test]
    async fn test_full_verification_flow() {
        let email_service = Arc::new(CapturingEmailService::new());
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(TestClock::new(Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap()));
        let service = VerificationService::new(
            email_service.clone(),
            store.clone(),
            VerificationServiceConfig::default(),
        )
        .with_clock(clock.clone());

        let issued = service
            .send_verification(
                "a@b.com",
                VerificationType::AccountVerification,
                TemplateData::new()
                    .with_user_name("Samuel")
                    .with_organization_name("First Baptist"),
            )
            .await
            .unwrap();
        assert!(issued.delivered);

        // The code the person types is the one from the email
        let text = email_service.last_text().await.unwrap();
        let code = extract_code(&text);
        assert_eq!(code, issued.record.code);

        let result = service
            .verify_code("a@b.com", VerificationType::AccountVerification, &code)
            .await
            .unwrap();
        assert!(result.valid);

        let replay = service
            .verify_code("a@b.com", VerificationType::AccountVerification, &code)
            .await
            .unwrap();
        assert!(!replay.valid);
        assert_eq!(replay.error_message().as_deref(), Some("already used"));
    }

    #[tokio::test]
    async fn test_code_expires_after_thirty_minutes() {
        let email_service = Arc::new(CapturingEmailService::new());
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(TestClock::new(Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap()));
        let service = VerificationService::new(
            email_service,
            store,
            VerificationServiceConfig::default(),
        )
        .with_clock(clock.clone());

        let issued = service
            .send_verification("a@b.com", VerificationType::PasswordReset, TemplateData::new())
            .await
            .unwrap();

        clock.advance(Duration::minutes(31));

        let result = service
            .verify_code("a@b.com", VerificationType::PasswordReset, &issued.record.code)
            .await
            .unwrap();
        assert!(!result.valid);
        assert_eq!(result.error_message().as_deref(), Some("expired"));
    }

    #[tokio::test]
    async fn test_concurrent_submissions_consume_code_once() {
        let store = Arc::new(MemoryStore::new());
        let service = Arc::new(VerificationService::new(
            Arc::new(CapturingEmailService::new()),
            store,
            VerificationServiceConfig::default(),
        ));

        let issued = service
            .send_verification(
                "a@b.com",
                VerificationType::AccountVerification,
                TemplateData::new(),
            )
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            let code = issued.record.code.clone();
            handles.push(tokio::spawn(async move {
                service
                    .verify_code("a@b.com", VerificationType::AccountVerification, &code)
                    .await
                    .unwrap()
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap().valid {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
    }
}
