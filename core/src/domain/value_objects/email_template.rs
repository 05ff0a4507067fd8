//! Rendered email content and the data interpolated into it.

use serde::{Deserialize, Serialize};

/// A rendered notification email
///
/// Produced purely from a template type and its data; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    /// Subject line
    pub subject: String,

    /// HTML body
    pub html: String,

    /// Plain-text alternative body
    pub text: String,
}

/// Values interpolated into notification templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateData {
    /// Recipient's display name
    pub user_name: Option<String>,

    /// Church organization the recipient belongs to
    pub organization_name: Option<String>,

    /// One-time verification code
    pub code: Option<String>,

    /// Recipient's role; accepted for forward compatibility, not rendered
    pub role: Option<String>,
}

impl TemplateData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    pub fn with_organization_name(mut self, organization_name: impl Into<String>) -> Self {
        self.organization_name = Some(organization_name.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}
