//! Verification code validation

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::VerificationFailure;

use super::types::VerifyCodeResult;

/// Check a submitted code against a stored record at time `now`
///
/// Checks run in a fixed order and stop at the first failure: used flag,
/// then expiry, then code equality. The record is not modified; marking it
/// used after a successful check is the caller's job.
pub fn validate_verification_code(
    submitted_code: &str,
    record: &VerificationRecord,
    now: DateTime<Utc>,
) -> VerifyCodeResult {
    if record.is_used {
        return VerifyCodeResult::failure(VerificationFailure::AlreadyUsed);
    }

    if record.is_expired_at(now) {
        return VerifyCodeResult::failure(VerificationFailure::Expired);
    }

    if !codes_match(&record.code, submitted_code) {
        return VerifyCodeResult::failure(VerificationFailure::InvalidCode);
    }

    VerifyCodeResult::success()
}

fn codes_match(stored_code: &str, submitted_code: &str) -> bool {
    stored_code.len() == submitted_code.len()
        && constant_time_eq(stored_code.as_bytes(), submitted_code.as_bytes())
}
