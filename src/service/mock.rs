use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde_json::json;

use crate::models::{CareerApplication, ContactForm};
use crate::service::error::SubmitError;
use crate::service::relay::Relay;

/// Development/testing relay: no network, simulated latency, and a
/// configurable random failure rate so UI error paths get exercised.
pub(crate) struct MockRelay {
    pub latency_ms: u64,
    pub failure_rate: f64,
}

impl MockRelay {
    async fn simulate(&self) -> Result<(), SubmitError> {
        tokio::time::sleep(Duration::from_millis(self.latency_ms)).await;
        if rand::thread_rng().gen::<f64>() < self.failure_rate {
            return Err(SubmitError::Provider(
                "Mock submission failed (random test failure)".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Relay for MockRelay {
    async fn submit_contact(
        &self,
        _client: &reqwest::Client,
        form: &ContactForm,
    ) -> Result<serde_json::Value, SubmitError> {
        tracing::debug!(email = %form.email, "mock contact submission");
        self.simulate().await?;
        Ok(json!({
            "success": true,
            "message": "Mock submission successful",
            "submitted_at": chrono::Utc::now().to_rfc3339(),
            "data": serde_json::to_value(form).unwrap_or(serde_json::Value::Null),
        }))
    }

    async fn submit_career(
        &self,
        _client: &reqwest::Client,
        application: &CareerApplication,
    ) -> Result<serde_json::Value, SubmitError> {
        tracing::debug!(email = %application.email, "mock career submission");
        self.simulate().await?;
        Ok(json!({
            "success": true,
            "message": "Mock submission successful",
            "submitted_at": chrono::Utc::now().to_rfc3339(),
            "data": serde_json::to_value(application).unwrap_or(serde_json::Value::Null),
        }))
    }
}
