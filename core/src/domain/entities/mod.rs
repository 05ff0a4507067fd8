//! Domain entities representing core business objects.

pub mod verification_record;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use verification_record::{
    generate_code, VerificationData, VerificationRecord, VerificationType, CODE_LENGTH, CODE_MAX,
    CODE_MIN, DEFAULT_EXPIRATION_MINUTES,
};
