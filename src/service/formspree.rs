use async_trait::async_trait;
use serde_json::json;

use crate::models::{CareerApplication, ContactForm};
use crate::service::error::SubmitError;
use crate::service::relay::Relay;

const ENDPOINT: &str = "https://formspree.io/f";

/// Formspree relay: one public form id, JSON in, JSON out.
pub(crate) struct Formspree {
    pub form_id: String,
}

#[async_trait]
impl Relay for Formspree {
    async fn submit_contact(
        &self,
        client: &reqwest::Client,
        form: &ContactForm,
    ) -> Result<serde_json::Value, SubmitError> {
        let body = json!({
            "name": form.name,
            "email": form.email,
            "company": form.company,
            "projectType": form.project_type,
            "message": form.message,
            "csrfToken": form.csrf_token,
        });

        let response = client
            .post(format!("{ENDPOINT}/{}", self.form_id))
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            // Formspree puts a human-readable reason in the error body.
            let reason = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| {
                    body.get("error")
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
