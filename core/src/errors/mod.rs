//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::VerificationFailure;

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Raised for template tags outside the closed set; a caller defect
    #[error("Unknown template type: {tag}")]
    UnknownTemplateType { tag: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Stable machine-readable code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::UnknownTemplateType { .. } => "UNKNOWN_TEMPLATE_TYPE",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
