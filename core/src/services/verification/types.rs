//! Types for verification service results

use serde::{Deserialize, Serialize};

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::VerificationFailure;

/// Result of issuing and sending a verification code
#[derive(Debug, Clone)]
pub struct SendVerificationResult {
    /// The record that was issued and persisted
    pub record: VerificationRecord,
    /// Whether some delivery provider accepted the email
    pub delivered: bool,
}

/// Result of checking a submitted code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyCodeResult {
    /// Whether the verification was successful
    pub valid: bool,
    /// Reason for rejection, absent when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<VerificationFailure>,
}

impl VerifyCodeResult {
    pub fn success() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn failure(reason: VerificationFailure) -> Self {
        Self {
            valid: false,
            error: Some(reason),
        }
    }

    /// Short reason text ("already used", "expired", ...)
    pub fn error_message(&self) -> Option<String> {
        self.error.map(|reason| reason.to_string())
    }
}
