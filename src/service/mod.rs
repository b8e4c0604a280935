mod custom;
mod emailjs;
mod error;
mod formspree;
mod mock;
mod relay;
mod web3forms;

pub use error::SubmitError;

use crate::config::{ConfigStatus, FormServiceConfig};
use crate::models::{CareerApplication, ContactForm, SubmissionResult};
use relay::build_relay;

/// Provider-agnostic submission adapter.
///
/// Owns one HTTP client and the immutable provider configuration; every
/// submission resolves to a [`SubmissionResult`], never a panic or an
/// escaped error. Provider selection happens per dispatch from the
/// configuration tag, so a missing credential is caught before any
/// network traffic.
pub struct FormService {
    config: FormServiceConfig,
    client: reqwest::Client,
}

impl FormService {
    pub fn new(config: FormServiceConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(FormServiceConfig::from_env())
    }

    pub fn config(&self) -> &FormServiceConfig {
        &self.config
    }

    /// Report configuration completeness without touching the network.
    pub fn validate_config(&self) -> ConfigStatus {
        self.config.status()
    }

    /// Dispatch a contact form to the configured provider.
    pub async fn submit_contact_form(&self, form: &ContactForm) -> SubmissionResult {
        match self.dispatch_contact(form).await {
            Ok(data) => {
                metrics::counter!("form_submissions_total", 1, "kind" => "contact");
                SubmissionResult::ok(data)
            }
            Err(err) => {
                metrics::counter!("form_submission_failures_total", 1, "reason" => err.kind());
                tracing::error!(error = %err, "contact form submission failed");
                SubmissionResult::from(err)
            }
        }
    }

    /// Dispatch a careers application, including its resume attachment
    /// where the provider supports one.
    pub async fn submit_career_application(
        &self,
        application: &CareerApplication,
    ) -> SubmissionResult {
        match self.dispatch_career(application).await {
            Ok(data) => {
                metrics::counter!("form_submissions_total", 1, "kind" => "career");
                SubmissionResult::ok(data)
            }
            Err(err) => {
                metrics::counter!("form_submission_failures_total", 1, "reason" => err.kind());
                tracing::error!(error = %err, "career application submission failed");
                SubmissionResult::from(err)
            }
        }
    }

    async fn dispatch_contact(
        &self,
        form: &ContactForm,
    ) -> Result<serde_json::Value, SubmitError> {
        let relay = build_relay(&self.config)?;
        relay.submit_contact(&self.client, form).await
    }

    async fn dispatch_career(
        &self,
        application: &CareerApplication,
    ) -> Result<serde_json::Value, SubmitError> {
        let relay = build_relay(&self.config)?;
        relay.submit_career(&self.client, application).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FormServiceKind, ENV_FORMSPREE_FORM_ID};
    use crate::models::ResumeAttachment;

    fn mock_service() -> FormService {
        FormService::new(FormServiceConfig {
            mock_latency_ms: 1,
            mock_failure_rate: 0.0,
            ..Default::default()
        })
    }

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Margaret Hamilton".to_string(),
            email: "margaret@example.com".to_string(),
            company: "Draper".to_string(),
            project_type: "Custom Software Solution".to_string(),
            message: "Looking for a team to harden our guidance software.".to_string(),
            website: None,
            csrf_token: String::new(),
        }
    }

    #[tokio::test]
    async fn mock_submission_succeeds_and_echoes_payload() {
        let result = mock_service().submit_contact_form(&valid_form()).await;
        assert!(result.success);
        let data = result.data.expect("mock result carries data");
        assert_eq!(data["data"]["email"], "margaret@example.com");
    }

    #[tokio::test]
    async fn missing_provider_settings_fail_before_any_network_call() {
        let service = FormService::new(FormServiceConfig {
            kind: FormServiceKind::Formspree,
            ..Default::default()
        });
        let result = service.submit_contact_form(&valid_form()).await;
        assert!(!result.success);
        assert!(result
            .error
            .expect("configuration error message")
            .contains(ENV_FORMSPREE_FORM_ID));
    }

    #[tokio::test]
    async fn career_application_round_trips_through_the_mock() {
        let application = CareerApplication {
            name: "Margaret Hamilton".to_string(),
            email: "margaret@example.com".to_string(),
            phone: String::new(),
            expertise: "Backend Development".to_string(),
            experience: "Decades of writing software that absolutely must not fail in flight."
                .to_string(),
            message: String::new(),
            resume: Some(ResumeAttachment {
                file_name: "resume.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                bytes: vec![0u8; 64],
            }),
        };
        let result = mock_service().submit_career_application(&application).await;
        assert!(result.success);
    }
}
