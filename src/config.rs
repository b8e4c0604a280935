use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const ENV_FORM_SERVICE_TYPE: &str = "FORM_SERVICE_TYPE";
pub const ENV_FORMSPREE_FORM_ID: &str = "FORMSPREE_FORM_ID";
pub const ENV_EMAILJS_SERVICE_ID: &str = "EMAILJS_SERVICE_ID";
pub const ENV_EMAILJS_TEMPLATE_ID: &str = "EMAILJS_TEMPLATE_ID";
pub const ENV_EMAILJS_PUBLIC_KEY: &str = "EMAILJS_PUBLIC_KEY";
pub const ENV_EMAILJS_TO_EMAIL: &str = "EMAILJS_TO_EMAIL";
pub const ENV_WEB3FORMS_ACCESS_KEY: &str = "WEB3FORMS_ACCESS_KEY";
pub const ENV_CUSTOM_FORM_ENDPOINT: &str = "CUSTOM_FORM_ENDPOINT";
pub const ENV_SITE_NAME: &str = "SITE_NAME";
pub const ENV_MOCK_LATENCY_MS: &str = "MOCK_LATENCY_MS";
pub const ENV_MOCK_FAILURE_RATE: &str = "MOCK_FAILURE_RATE";

const DEFAULT_SITE_NAME: &str = "Website";
const DEFAULT_MOCK_LATENCY_MS: u64 = 1500;
const DEFAULT_MOCK_FAILURE_RATE: f64 = 0.1;

/// The relay provider a submission is dispatched to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormServiceKind {
    Formspree,
    Emailjs,
    Web3forms,
    Custom,
    Mock,
}

impl FormServiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Formspree => "formspree",
            Self::Emailjs => "emailjs",
            Self::Web3forms => "web3forms",
            Self::Custom => "custom",
            Self::Mock => "mock",
        }
    }

    /// Parse a provider selector, case-insensitively. Unknown values yield None.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "formspree" => Some(Self::Formspree),
            "emailjs" => Some(Self::Emailjs),
            "web3forms" => Some(Self::Web3forms),
            "custom" => Some(Self::Custom),
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }
}

impl fmt::Display for FormServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration completeness report for the selected provider.
///
/// Produced without any network call; `missing` lists the environment
/// variable names that still need to be set.
#[derive(Clone, Debug, Serialize)]
pub struct ConfigStatus {
    pub service_type: FormServiceKind,
    pub configured: bool,
    pub missing: Vec<&'static str>,
}

/// Provider selection and credentials, resolved once at startup.
///
/// Treated as immutable for the life of the process; every part of the
/// crate that needs a setting receives this value rather than reading the
/// environment at its call site.
#[derive(Clone, Debug)]
pub struct FormServiceConfig {
    pub kind: FormServiceKind,
    pub formspree_form_id: Option<String>,
    pub emailjs_service_id: Option<String>,
    pub emailjs_template_id: Option<String>,
    pub emailjs_public_key: Option<String>,
    pub emailjs_to_email: Option<String>,
    pub web3forms_access_key: Option<String>,
    pub custom_endpoint: Option<String>,
    /// Used as the `from_name` presented to relay providers.
    pub site_name: String,
    pub mock_latency_ms: u64,
    pub mock_failure_rate: f64,
}

impl Default for FormServiceConfig {
    fn default() -> Self {
        Self {
            kind: FormServiceKind::Mock,
            formspree_form_id: None,
            emailjs_service_id: None,
            emailjs_template_id: None,
            emailjs_public_key: None,
            emailjs_to_email: None,
            web3forms_access_key: None,
            custom_endpoint: None,
            site_name: DEFAULT_SITE_NAME.to_string(),
            mock_latency_ms: DEFAULT_MOCK_LATENCY_MS,
            mock_failure_rate: DEFAULT_MOCK_FAILURE_RATE,
        }
    }
}

impl FormServiceConfig {
    /// Resolve the configuration from the process environment.
    ///
    /// An unset or unrecognized provider selector falls back to the mock
    /// provider so a fresh checkout works without credentials.
    pub fn from_env() -> Self {
        let kind = env::var(ENV_FORM_SERVICE_TYPE)
            .ok()
            .and_then(|raw| FormServiceKind::parse(&raw))
            .unwrap_or(FormServiceKind::Mock);

        Self {
            kind,
            formspree_form_id: non_empty_var(ENV_FORMSPREE_FORM_ID),
            emailjs_service_id: non_empty_var(ENV_EMAILJS_SERVICE_ID),
            emailjs_template_id: non_empty_var(ENV_EMAILJS_TEMPLATE_ID),
            emailjs_public_key: non_empty_var(ENV_EMAILJS_PUBLIC_KEY),
            emailjs_to_email: non_empty_var(ENV_EMAILJS_TO_EMAIL),
            web3forms_access_key: non_empty_var(ENV_WEB3FORMS_ACCESS_KEY),
            custom_endpoint: non_empty_var(ENV_CUSTOM_FORM_ENDPOINT),
            site_name: non_empty_var(ENV_SITE_NAME).unwrap_or_else(|| DEFAULT_SITE_NAME.to_string()),
            mock_latency_ms: env::var(ENV_MOCK_LATENCY_MS)
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(DEFAULT_MOCK_LATENCY_MS),
            mock_failure_rate: env::var(ENV_MOCK_FAILURE_RATE)
                .ok()
                .and_then(|raw| raw.parse::<f64>().ok())
                .map(|rate| rate.clamp(0.0, 1.0))
                .unwrap_or(DEFAULT_MOCK_FAILURE_RATE),
        }
    }

    /// Report which required settings are missing for the selected provider.
    pub fn status(&self) -> ConfigStatus {
        let mut missing = Vec::new();
        match self.kind {
            FormServiceKind::Formspree => {
                if self.formspree_form_id.is_none() {
                    missing.push(ENV_FORMSPREE_FORM_ID);
                }
            }
            FormServiceKind::Emailjs => {
                if self.emailjs_service_id.is_none() {
                    missing.push(ENV_EMAILJS_SERVICE_ID);
                }
                if self.emailjs_template_id.is_none() {
                    missing.push(ENV_EMAILJS_TEMPLATE_ID);
                }
                if self.emailjs_public_key.is_none() {
                    missing.push(ENV_EMAILJS_PUBLIC_KEY);
                }
            }
            FormServiceKind::Web3forms => {
                if self.web3forms_access_key.is_none() {
                    missing.push(ENV_WEB3FORMS_ACCESS_KEY);
                }
            }
            FormServiceKind::Custom => {
                if self.custom_endpoint.is_none() {
                    missing.push(ENV_CUSTOM_FORM_ENDPOINT);
                }
            }
            FormServiceKind::Mock => {}
        }

        ConfigStatus {
            service_type: self.kind,
            configured: missing.is_empty(),
            missing,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_providers_case_insensitively() {
        assert_eq!(FormServiceKind::parse("formspree"), Some(FormServiceKind::Formspree));
        assert_eq!(FormServiceKind::parse("EmailJS"), Some(FormServiceKind::Emailjs));
        assert_eq!(FormServiceKind::parse(" WEB3FORMS "), Some(FormServiceKind::Web3forms));
        assert_eq!(FormServiceKind::parse("custom"), Some(FormServiceKind::Custom));
        assert_eq!(FormServiceKind::parse("mock"), Some(FormServiceKind::Mock));
        assert_eq!(FormServiceKind::parse("sendgrid"), None);
    }

    #[test]
    fn mock_provider_needs_no_settings() {
        let status = FormServiceConfig::default().status();
        assert_eq!(status.service_type, FormServiceKind::Mock);
        assert!(status.configured);
        assert!(status.missing.is_empty());
    }

    #[test]
    fn formspree_reports_missing_form_id() {
        let config = FormServiceConfig {
            kind: FormServiceKind::Formspree,
            ..Default::default()
        };
        let status = config.status();
        assert!(!status.configured);
        assert_eq!(status.missing, vec![ENV_FORMSPREE_FORM_ID]);
    }

    #[test]
    fn emailjs_reports_every_missing_setting() {
        let config = FormServiceConfig {
            kind: FormServiceKind::Emailjs,
            emailjs_service_id: Some("service_x".into()),
            ..Default::default()
        };
        let status = config.status();
        assert!(!status.configured);
        assert_eq!(
            status.missing,
            vec![ENV_EMAILJS_TEMPLATE_ID, ENV_EMAILJS_PUBLIC_KEY]
        );
    }

    #[test]
    fn fully_configured_web3forms_passes() {
        let config = FormServiceConfig {
            kind: FormServiceKind::Web3forms,
            web3forms_access_key: Some("key".into()),
            ..Default::default()
        };
        assert!(config.status().configured);
    }
}
