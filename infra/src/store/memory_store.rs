//! In-memory verification record store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use ca_core::domain::entities::verification_record::{VerificationRecord, VerificationType};
use ca_core::services::verification::VerificationStoreTrait;
use ca_shared::email::normalize_email;

/// Records are grouped by normalized address and purpose, oldest first
type RecordKey = (String, VerificationType);

/// Process-local store for verification records
///
/// Records are never deleted; a newer record for the same address and
/// purpose supersedes older ones because lookups return the latest.
#[derive(Clone, Default)]
pub struct InMemoryVerificationStore {
    records: Arc<RwLock<HashMap<RecordKey, Vec<VerificationRecord>>>>,
}

impl InMemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Look up a record by id
    pub async fn get(&self, id: Uuid) -> Option<VerificationRecord> {
        self.records
            .read()
            .await
            .values()
            .flatten()
            .find(|record| record.id == id)
            .cloned()
    }

    fn key(email: &str, verification_type: VerificationType) -> RecordKey {
        (normalize_email(email), verification_type)
    }
}

#[async_trait]
impl VerificationStoreTrait for InMemoryVerificationStore {
    async fn save(&self, record: &VerificationRecord) -> Result<(), String> {
        let mut records = self.records.write().await;
        let entries = records
            .entry(Self::key(&record.email, record.verification_type))
            .or_default();

        if entries.iter().any(|existing| existing.id == record.id) {
            return Err(format!("Verification record {} already exists", record.id));
        }
        entries.push(record.clone());

        tracing::debug!(
            record_id = %record.id,
            verification_type = %record.verification_type,
            "Stored verification record"
        );
        Ok(())
    }

    async fn find_latest(
        &self,
        email: &str,
        verification_type: VerificationType,
    ) -> Result<Option<VerificationRecord>, String> {
        let records = self.records.read().await;
        // Insertion order breaks ties between records created at the same instant
        Ok(records
            .get(&Self::key(email, verification_type))
            .and_then(|entries| entries.iter().max_by_key(|record| record.created_at))
            .cloned())
    }

    async fn mark_used(&self, id: Uuid) -> Result<bool, String> {
        let mut records = self.records.write().await;
        let record = records
            .values_mut()
            .flatten()
            .find(|record| record.id == id)
            .ok_or_else(|| format!("Verification record {} not found", id))?;

        if record.is_used {
            return Ok(false);
        }
        record.mark_as_used();
        Ok(true)
    }
}
