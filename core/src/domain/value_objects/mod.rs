//! Value objects representing immutable domain concepts.

pub mod email_template;

// Re-export commonly used types
pub use email_template::{EmailTemplate, TemplateData};
