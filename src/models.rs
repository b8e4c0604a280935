use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::security::sanitize_input;
use crate::service::SubmitError;

pub const RESUME_MAX_BYTES: usize = 5 * 1024 * 1024;
pub const RESUME_ALLOWED_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// A contact-form submission as collected by the UI layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: String,
    pub project_type: String,
    pub message: String,
    /// Honeypot field - should be empty for legitimate users
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub csrf_token: String,
}

impl ContactForm {
    /// Copy of the form with every visitor-typed field sanitized.
    ///
    /// The honeypot value is preserved as-is; it is evidence, not content.
    pub fn sanitized(&self) -> Self {
        Self {
            name: sanitize_input(&self.name),
            email: sanitize_input(&self.email),
            company: sanitize_input(&self.company),
            project_type: sanitize_input(&self.project_type),
            message: sanitize_input(&self.message),
            website: self.website.clone(),
            csrf_token: self.csrf_token.clone(),
        }
    }
}

/// A careers-page application, optionally carrying a resume attachment.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerApplication {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub expertise: String,
    pub experience: String,
    #[serde(default)]
    pub message: String,
    #[serde(skip)]
    pub resume: Option<ResumeAttachment>,
}

impl CareerApplication {
    pub fn sanitized(&self) -> Self {
        Self {
            name: sanitize_input(&self.name),
            email: sanitize_input(&self.email),
            phone: sanitize_input(&self.phone),
            expertise: sanitize_input(&self.expertise),
            experience: sanitize_input(&self.experience),
            message: sanitize_input(&self.message),
            resume: self.resume.clone(),
        }
    }
}

/// An uploaded resume, held in memory until dispatch.
#[derive(Clone, Debug)]
pub struct ResumeAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ResumeAttachment {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Aggregated field-level validation outcome.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: HashMap<String, String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: HashMap::new(),
        }
    }

    pub fn from_errors(errors: HashMap<String, String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Uniform outcome of a submission attempt, consumed directly by the UI.
///
/// Every path through the adapter and pipeline resolves to this shape;
/// no error is allowed to escape as a panic or unhandled `Err`.
#[derive(Clone, Debug, Serialize)]
pub struct SubmissionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

impl SubmissionResult {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            field_errors: None,
            retry_after_seconds: None,
        }
    }

    fn rejected(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            field_errors: None,
            retry_after_seconds: None,
        }
    }
}

impl From<SubmitError> for SubmissionResult {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(validation) => Self {
                field_errors: Some(validation.errors),
                ..Self::rejected("Please correct the highlighted fields and try again.".to_string())
            },
            SubmitError::RateLimited {
                retry_after_seconds,
            } => Self {
                retry_after_seconds: Some(retry_after_seconds),
                ..Self::rejected(format!(
                    "Too many attempts. Please wait {} seconds before trying again.",
                    retry_after_seconds
                ))
            },
            SubmitError::TooFast => Self::rejected(
                "Please take a moment to review your message before submitting.".to_string(),
            ),
            SubmitError::SpamDetected { .. } => Self::rejected(
                "Message contains suspicious content. Please revise and try again.".to_string(),
            ),
            other => Self::rejected(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> ContactForm {
        ContactForm {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            company: String::new(),
            project_type: "Consultation".to_string(),
            message: "We need help <b>modernizing</b> a legacy analytics pipeline.".to_string(),
            website: None,
            csrf_token: String::new(),
        }
    }

    #[test]
    fn sanitized_strips_markup_from_every_field() {
        let mut form = sample_form();
        form.name = "Ada <script>alert(1)</script>Lovelace".to_string();
        let clean = form.sanitized();
        assert_eq!(clean.name, "Ada Lovelace");
        assert!(!clean.message.contains('<'));
    }

    #[test]
    fn sanitized_preserves_honeypot_evidence() {
        let mut form = sample_form();
        form.website = Some("<b>bot</b>".to_string());
        assert_eq!(form.sanitized().website.as_deref(), Some("<b>bot</b>"));
    }

    #[test]
    fn validation_result_tracks_error_presence() {
        assert!(ValidationResult::valid().is_valid);
        let mut errors = HashMap::new();
        errors.insert("email".to_string(), "Email is required".to_string());
        let result = ValidationResult::from_errors(errors);
        assert!(!result.is_valid);
    }

    #[test]
    fn rate_limit_rejection_carries_retry_hint() {
        let result = SubmissionResult::from(SubmitError::RateLimited {
            retry_after_seconds: 42,
        });
        assert!(!result.success);
        assert_eq!(result.retry_after_seconds, Some(42));
        assert!(result.error.unwrap().contains("42 seconds"));
    }
}
