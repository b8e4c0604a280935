use async_trait::async_trait;

use crate::models::{CareerApplication, ContactForm};
use crate::service::error::SubmitError;
use crate::service::relay::Relay;

/// Opaque JSON POST to an operator-supplied endpoint, for deployments that
/// front their own serverless function instead of a hosted relay.
pub(crate) struct CustomEndpoint {
    pub endpoint: String,
}

#[async_trait]
impl Relay for CustomEndpoint {
    async fn submit_contact(
        &self,
        client: &reqwest::Client,
        form: &ContactForm,
    ) -> Result<serde_json::Value, SubmitError> {
        let response = client.post(&self.endpoint).json(form).send().await?;

        if !response.status().is_success() {
            let reason = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| {
                    body.get("message")
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| "Failed to submit form".to_string());
            return Err(SubmitError::Provider(reason));
        }

        Ok(response.json().await?)
    }

    async fn submit_career(
        &self,
        _client: &reqwest::Client,
        _application: &CareerApplication,
    ) -> Result<serde_json::Value, SubmitError> {
        Err(SubmitError::Unsupported("resume submission"))
    }
}
