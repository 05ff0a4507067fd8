//! Notification email templates keyed by verification type
//!
//! Bodies are `tera` templates compiled into the binary. HTML templates are
//! auto-escaped by the engine; plain-text templates are rendered verbatim.

use once_cell::sync::Lazy;
use tera::{Context, Tera};

use crate::domain::entities::verification_record::{VerificationType, DEFAULT_EXPIRATION_MINUTES};
use crate::domain::value_objects::email_template::{EmailTemplate, TemplateData};
use crate::errors::{DomainError, DomainResult};

const DEFAULT_ORGANIZATION_NAME: &str = "Church Admin";
const DEFAULT_APP_BASE_URL: &str = "http://localhost:3000";

static TERA: Lazy<Result<Tera, String>> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("layout.html", include_str!("../../../templates/email/layout.html")),
        ("code_block.html", include_str!("../../../templates/email/code_block.html")),
        (
            "account_verification.html",
            include_str!("../../../templates/email/account_verification.html"),
        ),
        (
            "account_verification.txt",
            include_str!("../../../templates/email/account_verification.txt"),
        ),
        ("password_reset.html", include_str!("../../../templates/email/password_reset.html")),
        ("password_reset.txt", include_str!("../../../templates/email/password_reset.txt")),
        ("welcome.html", include_str!("../../../templates/email/welcome.html")),
        ("welcome.txt", include_str!("../../../templates/email/welcome.txt")),
    ])
    .map_err(|e| format!("Failed to load email templates: {}", e))?;
    Ok(tera)
});

/// Template renderer bound to the application's base URL
#[derive(Debug, Clone)]
pub struct EmailTemplates {
    app_base_url: String,
    code_expiration_minutes: i64,
}

impl Default for EmailTemplates {
    fn default() -> Self {
        Self::new(DEFAULT_APP_BASE_URL, DEFAULT_EXPIRATION_MINUTES)
    }
}

impl EmailTemplates {
    pub fn new(app_base_url: impl Into<String>, code_expiration_minutes: i64) -> Self {
        Self {
            app_base_url: app_base_url.into().trim_end_matches('/').to_string(),
            code_expiration_minutes,
        }
    }

    /// Render the template for `verification_type`
    pub fn render(
        &self,
        verification_type: VerificationType,
        data: &TemplateData,
    ) -> DomainResult<EmailTemplate> {
        let organization = organization_name(data);
        let (name, subject, title) = match verification_type {
            VerificationType::AccountVerification => (
                "account_verification",
                format!("Verify your email address - {}", organization),
                String::from("Verify your email address"),
            ),
            VerificationType::PasswordReset => (
                "password_reset",
                format!("Reset your password - {}", organization),
                String::from("Reset your password"),
            ),
            VerificationType::Welcome => (
                "welcome",
                format!("Welcome to {}", organization),
                format!("Welcome to {}", organization),
            ),
        };

        let mut context = Context::new();
        context.insert("title", &title);
        context.insert("greeting", &greeting(data));
        context.insert("organization", organization);
        context.insert("code", data.code.as_deref().unwrap_or_default());
        context.insert("minutes", &self.code_expiration_minutes);
        context.insert("login_url", &format!("{}/login", self.app_base_url));

        Ok(EmailTemplate {
            subject,
            html: render_file(&format!("{}.html", name), &context)?,
            text: render_file(&format!("{}.txt", name), &context)?,
        })
    }

    /// Render the template named by a wire tag such as `"password_reset"`
    ///
    /// Unknown tags fail with `DomainError::UnknownTemplateType`.
    pub fn render_tag(&self, tag: &str, data: &TemplateData) -> DomainResult<EmailTemplate> {
        let verification_type: VerificationType = tag.parse()?;
        self.render(verification_type, data)
    }
}

/// Render `verification_type` with the default renderer
///
/// Links point at `http://localhost:3000`. Use
/// [`VerificationIssuer::templates`](super::VerificationIssuer::templates) for
/// the configured base URL.
pub fn get_email_template(
    verification_type: VerificationType,
    data: &TemplateData,
) -> DomainResult<EmailTemplate> {
    EmailTemplates::default().render(verification_type, data)
}

/// Render the template named by `tag` with the default renderer
///
/// Links point at `http://localhost:3000`, as for [`get_email_template`].
pub fn get_email_template_by_tag(tag: &str, data: &TemplateData) -> DomainResult<EmailTemplate> {
    EmailTemplates::default().render_tag(tag, data)
}

fn render_file(name: &str, context: &Context) -> DomainResult<String> {
    let tera = TERA.as_ref().map_err(|e| DomainError::Internal { message: e.clone() })?;
    tera.render(name, context).map_err(|e| DomainError::Internal {
        message: format!("Failed to render template {}: {}", name, e),
    })
}

fn organization_name(data: &TemplateData) -> &str {
    data.organization_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(DEFAULT_ORGANIZATION_NAME)
}

fn greeting(data: &TemplateData) -> String {
    match data.user_name.as_deref().filter(|name| !name.trim().is_empty()) {
        Some(name) => format!("Hello {},", name),
        None => String::from("Hello,"),
    }
}
