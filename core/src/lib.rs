//! # ChurchAdmin Core
//!
//! Core business logic for email verification in the ChurchAdmin backend.
//! This crate contains the verification record entity, notification
//! templates, the code validator, the verification workflow service, the
//! traits its collaborators implement, and error types.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
