use async_trait::async_trait;

use crate::config::{
    FormServiceConfig, FormServiceKind, ENV_CUSTOM_FORM_ENDPOINT, ENV_EMAILJS_PUBLIC_KEY,
    ENV_EMAILJS_SERVICE_ID, ENV_EMAILJS_TEMPLATE_ID, ENV_FORMSPREE_FORM_ID,
    ENV_WEB3FORMS_ACCESS_KEY,
};
use crate::models::{CareerApplication, ContactForm};
use crate::service::custom::CustomEndpoint;
use crate::service::emailjs::EmailJs;
use crate::service::error::SubmitError;
use crate::service::formspree::Formspree;
use crate::service::mock::MockRelay;
use crate::service::web3forms::Web3Forms;

/// One relay provider's submit capability.
///
/// Implementations map the generic payload onto their wire shape, issue a
/// single POST, and normalize the outcome. They never retry.
#[async_trait]
pub(crate) trait Relay: Send + Sync {
    async fn submit_contact(
        &self,
        client: &reqwest::Client,
        form: &ContactForm,
    ) -> Result<serde_json::Value, SubmitError>;

    async fn submit_career(
        &self,
        client: &reqwest::Client,
        application: &CareerApplication,
    ) -> Result<serde_json::Value, SubmitError>;
}

/// Resolve the configured provider into a relay instance.
///
/// Fails with the full list of missing settings so the caller can report
/// them all at once, before any network call is attempted.
pub(crate) fn build_relay(config: &FormServiceConfig) -> Result<Box<dyn Relay>, SubmitError> {
    match config.kind {
        FormServiceKind::Formspree => {
            let form_id = config
                .formspree_form_id
                .clone()
                .ok_or(SubmitError::Configuration {
                    missing: vec![ENV_FORMSPREE_FORM_ID],
                })?;
            Ok(Box::new(Formspree { form_id }))
        }
        FormServiceKind::Emailjs => {
            let mut missing = Vec::new();
            if config.emailjs_service_id.is_none() {
                missing.push(ENV_EMAILJS_SERVICE_ID);
            }
            if config.emailjs_template_id.is_none() {
                missing.push(ENV_EMAILJS_TEMPLATE_ID);
            }
            if config.emailjs_public_key.is_none() {
                missing.push(ENV_EMAILJS_PUBLIC_KEY);
            }
            match (
                config.emailjs_service_id.clone(),
                config.emailjs_template_id.clone(),
                config.emailjs_public_key.clone(),
            ) {
                (Some(service_id), Some(template_id), Some(public_key)) => Ok(Box::new(EmailJs {
                    service_id,
                    template_id,
                    public_key,
                    to_email: config.emailjs_to_email.clone(),
                })),
                _ => Err(SubmitError::Configuration { missing }),
            }
        }
        FormServiceKind::Web3forms => {
            let access_key =
                config
                    .web3forms_access_key
                    .clone()
                    .ok_or(SubmitError::Configuration {
                        missing: vec![ENV_WEB3FORMS_ACCESS_KEY],
                    })?;
            Ok(Box::new(Web3Forms {
                access_key,
                from_name: config.site_name.clone(),
            }))
        }
        FormServiceKind::Custom => {
            let endpoint = config
                .custom_endpoint
                .clone()
                .ok_or(SubmitError::Configuration {
                    missing: vec![ENV_CUSTOM_FORM_ENDPOINT],
                })?;
            Ok(Box::new(CustomEndpoint { endpoint }))
        }
        FormServiceKind::Mock => Ok(Box::new(MockRelay {
            latency_ms: config.mock_latency_ms,
            failure_rate: config.mock_failure_rate,
        })),
    }
}
