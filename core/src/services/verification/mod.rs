//! Email verification module
//!
//! - Code generation with a fixed time-to-live
//! - Notification templates keyed by verification type
//! - Pure code validation with distinct failure reasons
//! - A workflow service tying issuing, storage and delivery together

mod config;
mod issuer;
mod service;
mod templates;
mod traits;
mod types;
mod validator;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use issuer::VerificationIssuer;
pub use service::VerificationService;
pub use templates::{get_email_template, get_email_template_by_tag, EmailTemplates};
pub use traits::{Clock, EmailServiceTrait, SystemClock, VerificationStoreTrait};
pub use types::{SendVerificationResult, VerifyCodeResult};
pub use validator::validate_verification_code;
