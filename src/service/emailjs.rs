use async_trait::async_trait;
use serde_json::json;

use crate::models::{CareerApplication, ContactForm};
use crate::service::error::SubmitError;
use crate::service::relay::Relay;

const ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// EmailJS relay: a service/template/public-key triple addressing a
/// pre-built email template. Responds with plain text, not JSON.
pub(crate) struct EmailJs {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
    pub to_email: Option<String>,
}

#[async_trait]
impl Relay for EmailJs {
    async fn submit_contact(
        &self,
        client: &reqwest::Client,
        form: &ContactForm,
    ) -> Result<serde_json::Value, SubmitError> {
        let mut template_params = json!({
            "from_name": form.name,
            "from_email": form.email,
            "company": if form.company.is_empty() { "N/A" } else { form.company.as_str() },
            "project_type": form.project_type,
            "message": form.message,
        });
        if let Some(to_email) = &self.to_email {
            template_params["to_email"] = json!(to_email);
        }

        let body = json!({
            "service_id": self.service_id,
            "template_id": self.template_id,
            "user_id": self.public_key,
            "template_params": template_params,
        });

        let response = client.post(ENDPOINT).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(SubmitError::Provider(
                "Failed to send email via EmailJS".to_string(),
            ));
        }

        Ok(json!({ "success": true, "message": "Email sent successfully" }))
    }

    async fn submit_career(
        &self,
        _client: &reqwest::Client,
        _application: &CareerApplication,
    ) -> Result<serde_json::Value, SubmitError> {
        Err(SubmitError::Unsupported("resume submission"))
    }
}
