//! Business services containing domain logic and use cases.

pub mod verification;

// Re-export commonly used types
pub use verification::{
    get_email_template, get_email_template_by_tag, validate_verification_code, Clock,
    EmailServiceTrait, EmailTemplates, SendVerificationResult, SystemClock, VerificationIssuer,
    VerificationService, VerificationServiceConfig, VerificationStoreTrait, VerifyCodeResult,
};
