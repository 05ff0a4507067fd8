//! Verification record entity for email-based one-time codes.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::DomainError;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Smallest code that can be issued
pub const CODE_MIN: u32 = 100_000;

/// Largest code that can be issued
pub const CODE_MAX: u32 = 999_999;

/// Default expiration time for verification codes (30 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 30;

/// Purpose of a verification email; selects the template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationType {
    AccountVerification,
    PasswordReset,
    Welcome,
}

impl VerificationType {
    /// Every supported purpose
    pub const ALL: [VerificationType; 3] = [
        VerificationType::AccountVerification,
        VerificationType::PasswordReset,
        VerificationType::Welcome,
    ];

    /// Wire tag of this purpose
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationType::AccountVerification => "account_verification",
            VerificationType::PasswordReset => "password_reset",
            VerificationType::Welcome => "welcome",
        }
    }
}

impl fmt::Display for VerificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerificationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "account_verification" => Ok(VerificationType::AccountVerification),
            "password_reset" => Ok(VerificationType::PasswordReset),
            "welcome" => Ok(VerificationType::Welcome),
            other => Err(DomainError::UnknownTemplateType {
                tag: other.to_string(),
            }),
        }
    }
}

/// A freshly generated code and its expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationData {
    /// The 6-digit verification code
    pub code: String,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,
}

impl VerificationData {
    /// Generates a new code valid for `expiration_minutes` from `now`
    pub fn generate_at(now: DateTime<Utc>, expiration_minutes: i64) -> Self {
        Self {
            code: generate_code(),
            expires_at: now + Duration::minutes(expiration_minutes),
        }
    }
}

/// Generates a uniformly random 6-digit code in `CODE_MIN..=CODE_MAX`
///
/// Codes are meant to be typed by people, not used as secrets, so the
/// thread-local generator is sufficient.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    rng.gen_range(CODE_MIN..=CODE_MAX).to_string()
}

/// Persisted state of one issued verification code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Address the code was sent to
    pub email: String,

    /// The 6-digit verification code
    pub code: String,

    /// Purpose of the code
    #[serde(rename = "type")]
    pub verification_type: VerificationType,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,

    /// Whether the code has been successfully used
    pub is_used: bool,

    /// Timestamp when the code was created
    pub created_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Creates a new record with a random code and the default 30-minute expiry
    pub fn new(email: String, verification_type: VerificationType) -> Self {
        Self::new_with_expiration(
            email,
            verification_type,
            Utc::now(),
            DEFAULT_EXPIRATION_MINUTES,
        )
    }

    /// Creates a new record issued at `now` with a custom expiration time
    pub fn new_with_expiration(
        email: String,
        verification_type: VerificationType,
        now: DateTime<Utc>,
        expiration_minutes: i64,
    ) -> Self {
        let data = VerificationData::generate_at(now, expiration_minutes);
        Self::from_data(email, verification_type, data, now)
    }

    /// Builds a record around already generated code data
    pub fn from_data(
        email: String,
        verification_type: VerificationType,
        data: VerificationData,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            code: data.code,
            verification_type,
            expires_at: data.expires_at,
            is_used: false,
            created_at,
        }
    }

    /// Checks if the code is past its expiry at `now`
    ///
    /// The expiry instant itself is still valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Checks if the code has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Gets the time remaining until expiration, or zero if expired
    pub fn time_until_expiration_at(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }

    /// Marks the record as used. There is no way back to unused.
    pub fn mark_as_used(&mut self) {
        self.is_used = true;
    }

    /// Whether this record was issued to `email` for `verification_type`
    pub fn belongs_to(&self, email: &str, verification_type: VerificationType) -> bool {
        self.verification_type == verification_type && self.email.eq_ignore_ascii_case(email)
    }
}
