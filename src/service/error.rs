use thiserror::Error;

use crate::models::ValidationResult;

/// Everything that can stop a submission, local or remote.
///
/// Configuration and validation failures are decided before any network
/// I/O; the remaining variants describe the dispatch itself.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("form service is not fully configured: missing {}", .missing.join(", "))]
    Configuration { missing: Vec<&'static str> },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("the form service rejected the submission: {0}")]
    Provider(String),

    #[error("{0} is not supported by the configured provider")]
    Unsupported(&'static str),

    #[error("submission failed validation")]
    Validation(ValidationResult),

    #[error("message flagged by spam heuristics: {}", .reasons.join("; "))]
    SpamDetected { reasons: Vec<String> },

    #[error("too many attempts, retry in {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("form was submitted too quickly")]
    TooFast,
}

impl SubmitError {
    /// Short tag for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Network(_) => "network",
            Self::Provider(_) => "provider",
            Self::Unsupported(_) => "unsupported",
            Self::Validation(_) => "validation",
            Self::SpamDetected { .. } => "spam",
            Self::RateLimited { .. } => "rate_limited",
            Self::TooFast => "too_fast",
        }
    }
}
