//! Verification failure reasons
//!
//! These are expected, user-facing outcomes of checking a submitted code and
//! are returned as data rather than raised as errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a submitted verification code was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationFailure {
    /// The code was already consumed by an earlier successful verification
    #[error("already used")]
    AlreadyUsed,

    /// The code is past its expiry time
    #[error("expired")]
    Expired,

    /// The submitted code does not match the issued one
    #[error("invalid code")]
    InvalidCode,

    /// No code has been issued for this address and purpose
    #[error("not found")]
    NotFound,
}

impl VerificationFailure {
    /// Stable machine-readable code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyUsed => "VERIFICATION_CODE_ALREADY_USED",
            Self::Expired => "VERIFICATION_CODE_EXPIRED",
            Self::InvalidCode => "VERIFICATION_CODE_INVALID",
            Self::NotFound => "VERIFICATION_CODE_NOT_FOUND",
        }
    }

    /// Message suitable for showing to the person entering the code
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::AlreadyUsed => "This code has already been used. Please request a new one.",
            Self::Expired => "This code has expired. Please request a new one.",
            Self::InvalidCode => "The code you entered is incorrect. Please check and try again.",
            Self::NotFound => "No verification code was requested for this address.",
        }
    }
}
