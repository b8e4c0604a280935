use async_trait::async_trait;
use reqwest::multipart;
use serde_json::json;

use crate::models::{CareerApplication, ContactForm};
use crate::service::error::SubmitError;
use crate::service::relay::Relay;

const ENDPOINT: &str = "https://api.web3forms.com/submit";

/// Web3Forms relay.
///
/// The access key is a public, client-side credential; abuse control lives
/// in the provider's domain whitelist and server-side rate limits, not in
/// the key's secrecy. Contact submissions go out as JSON; career
/// applications use multipart so the resume rides along as an attachment.
pub(crate) struct Web3Forms {
    pub access_key: String,
    pub from_name: String,
}

impl Web3Forms {
    /// Web3Forms signals rejection in-band: HTTP 200 with `success: false`.
    fn interpret(body: serde_json::Value) -> Result<serde_json::Value, SubmitError> {
        let success = body
            .get("success")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        if !success {
            let reason = body
                .get("message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("Failed to submit form")
                .to_string();
            return Err(SubmitError::Provider(reason));
        }
        Ok(body)
    }
}

#[async_trait]
impl Relay for Web3Forms {
    async fn submit_contact(
        &self,
        client: &reqwest::Client,
        form: &ContactForm,
    ) -> Result<serde_json::Value, SubmitError> {
        let body = json!({
            "access_key": self.access_key,
            "name": form.name,
            "email": form.email,
            "company": form.company,
            "project_type": form.project_type,
            "message": form.message,
            "subject": format!("New Contact Form Submission - {}", form.project_type),
            "from_name": self.from_name,
        });

        let response = client
            .post(ENDPOINT)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        Self::interpret(response.json().await?)
    }

    async fn submit_career(
        &self,
        client: &reqwest::Client,
        application: &CareerApplication,
    ) -> Result<serde_json::Value, SubmitError> {
        let mut form = multipart::Form::new()
            .text("access_key", self.access_key.clone())
            .text(
                "subject",
                format!("New Career Application - {}", application.name),
            )
            .text("from_name", format!("{} Careers", self.from_name))
            .text("Name", application.name.clone())
            .text("Email", application.email.clone())
            .text("Phone", application.phone.clone())
            .text("Area of Expertise", application.expertise.clone())
            .text("Professional Experience", application.experience.clone());

        if !application.message.is_empty() {
            form = form.text("Additional Information", application.message.clone());
        }

        if let Some(resume) = &application.resume {
            let part = multipart::Part::bytes(resume.bytes.clone())
                .file_name(resume.file_name.clone())
                .mime_str(&resume.content_type)?;
            form = form.part("attachment", part);
        }

        let response = client.post(ENDPOINT).multipart(form).send().await?;

        Self::interpret(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_band_rejection_surfaces_the_provider_message() {
        let outcome = Web3Forms::interpret(json!({
            "success": false,
            "message": "Access key is invalid",
        }));
        match outcome {
            Err(SubmitError::Provider(reason)) => assert_eq!(reason, "Access key is invalid"),
            _ => panic!("expected provider rejection"),
        }
    }

    #[test]
    fn successful_body_passes_through() {
        let body = json!({ "success": true, "message": "ok" });
        assert!(Web3Forms::interpret(body).is_ok());
    }

    #[test]
    fn missing_success_flag_counts_as_rejection() {
        assert!(Web3Forms::interpret(json!({ "message": "weird" })).is_err());
    }
}
