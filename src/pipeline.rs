use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use uuid::Uuid;

use crate::models::{CareerApplication, ContactForm, SubmissionResult};
use crate::security::bot::{is_honeypot_filled, is_suspiciously_fast, DEFAULT_MIN_FILL_MS};
use crate::security::burst::{BurstLimiter, DEFAULT_BURST_PER_MINUTE};
use crate::security::rate_limiter::{
    hash_identifier, RateLimitStore, SweeperHandle, DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW_MS,
};
use crate::security::spam::SpamDetector;
use crate::security::validator::{validate_career, validate_contact};
use crate::service::{FormService, SubmitError};

/// When a honeypot submission is faked out, how long to pretend to work.
const HONEYPOT_DELAY_MS: u64 = 2000;

/// Timestamps the UI records around the form lifecycle, in epoch millis.
#[derive(Debug, Clone, Copy)]
pub struct FormTiming {
    pub loaded_at_ms: u64,
    pub submitted_at_ms: u64,
}

/// Thresholds for the pre-dispatch checks.
#[derive(Debug, Clone, Copy)]
pub struct GatewayPolicy {
    pub max_attempts: u32,
    pub window_ms: u64,
    pub min_fill_ms: u64,
    pub honeypot_delay_ms: u64,
    pub burst_per_minute: u32,
}

impl Default for GatewayPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            window_ms: DEFAULT_WINDOW_MS,
            min_fill_ms: DEFAULT_MIN_FILL_MS,
            honeypot_delay_ms: HONEYPOT_DELAY_MS,
            burst_per_minute: DEFAULT_BURST_PER_MINUTE,
        }
    }
}

/// Composes the security heuristics and the submission adapter into the
/// check ordering a form UI needs: honeypot, timing, burst, sliding
/// window, sanitization and validation, then dispatch.
///
/// Each call is a single linear pass. A rejected or failed attempt leaves
/// no state behind other than the rate-limit bookkeeping; re-entry happens
/// only when the visitor submits again.
pub struct FormGateway {
    service: FormService,
    store: Arc<RateLimitStore>,
    burst: BurstLimiter,
    detector: SpamDetector,
    policy: GatewayPolicy,
}

impl FormGateway {
    pub fn new(service: FormService, policy: GatewayPolicy) -> Self {
        Self {
            service,
            store: Arc::new(RateLimitStore::new()),
            burst: BurstLimiter::new(policy.burst_per_minute),
            detector: SpamDetector::new(),
            policy,
        }
    }

    pub fn from_env() -> Self {
        Self::new(FormService::from_env(), GatewayPolicy::default())
    }

    pub fn service(&self) -> &FormService {
        &self.service
    }

    /// Spawn the periodic ledger sweep. The handle cancels the timer on
    /// shutdown or drop so a torn-down context does not keep the process
    /// alive.
    pub fn start_sweeper(&self, period: Duration) -> SweeperHandle {
        self.store.start_sweeper(period)
    }

    /// Reset rate-limit bookkeeping. Intended for test isolation.
    pub fn reset_limits(&self) {
        self.store.clear();
        self.burst.reset();
    }

    /// Run a contact submission through every check, dispatching only when
    /// all of them pass.
    pub async fn submit_contact(&self, form: &ContactForm, timing: FormTiming) -> SubmissionResult {
        let attempt = Uuid::new_v4();

        // Bots that filled the decoy field get a delayed, success-shaped
        // answer and the payload is dropped without dispatch, so automated
        // callers cannot tell they were detected.
        if is_honeypot_filled(form.website.as_deref()) {
            tracing::warn!(%attempt, "honeypot field filled, silently dropping submission");
            metrics::counter!("form_rejections_total", 1, "reason" => "honeypot");
            tokio::time::sleep(Duration::from_millis(self.policy.honeypot_delay_ms)).await;
            return SubmissionResult::ok(json!({ "message": "Thank you for your message." }));
        }

        if is_suspiciously_fast(
            timing.loaded_at_ms,
            timing.submitted_at_ms,
            self.policy.min_fill_ms,
        ) {
            tracing::warn!(%attempt, "submission completed faster than a human plausibly types");
            metrics::counter!("form_rejections_total", 1, "reason" => "too_fast");
            return SubmissionResult::from(SubmitError::TooFast);
        }

        let identifier = form.email.trim().to_lowercase();

        if !self.burst.check(&hash_identifier(&identifier)) {
            metrics::counter!("form_rejections_total", 1, "reason" => "burst");
            return SubmissionResult::from(SubmitError::RateLimited {
                retry_after_seconds: 60,
            });
        }

        let decision =
            self.store
                .check(&identifier, self.policy.max_attempts, self.policy.window_ms);
        if !decision.allowed {
            tracing::warn!(%attempt, "submission refused by sliding-window rate limit");
            metrics::counter!("form_rejections_total", 1, "reason" => "rate_limited");
            return SubmissionResult::from(SubmitError::RateLimited {
                retry_after_seconds: decision.retry_after_seconds(),
            });
        }

        let clean = form.sanitized();

        let spam = self.detector.analyze(&clean.message);
        if spam.is_suspicious {
            tracing::warn!(%attempt, reasons = ?spam.reasons, "message flagged by spam heuristics");
            metrics::counter!("form_rejections_total", 1, "reason" => "spam");
            return SubmissionResult::from(SubmitError::SpamDetected {
                reasons: spam.reasons,
            });
        }

        let validation = validate_contact(&clean);
        if !validation.is_valid {
            metrics::counter!("form_rejections_total", 1, "reason" => "validation");
            return SubmissionResult::from(SubmitError::Validation(validation));
        }

        tracing::info!(%attempt, "contact submission passed all checks, dispatching");
        self.service.submit_contact_form(&clean).await
    }

    /// Careers applications skip the bot checks (the page has no honeypot)
    /// but are validated and sanitized the same way.
    pub async fn submit_career(&self, application: &CareerApplication) -> SubmissionResult {
        let clean = application.sanitized();

        let validation = validate_career(&clean);
        if !validation.is_valid {
            metrics::counter!("form_rejections_total", 1, "reason" => "validation");
            return SubmissionResult::from(SubmitError::Validation(validation));
        }

        self.service.submit_career_application(&clean).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormServiceConfig;

    fn mock_gateway() -> FormGateway {
        let service = FormService::new(FormServiceConfig {
            mock_latency_ms: 1,
            mock_failure_rate: 0.0,
            ..Default::default()
        });
        let policy = GatewayPolicy {
            honeypot_delay_ms: 10,
            ..Default::default()
        };
        FormGateway::new(service, policy)
    }

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Katherine Johnson".to_string(),
            email: "katherine@example.com".to_string(),
            company: String::new(),
            project_type: "System Integration".to_string(),
            message: "We would like an assessment of our trajectory planning service."
                .to_string(),
            website: None,
            csrf_token: String::new(),
        }
    }

    fn unhurried() -> FormTiming {
        FormTiming {
            loaded_at_ms: 1_700_000_000_000,
            submitted_at_ms: 1_700_000_010_000,
        }
    }

    #[tokio::test]
    async fn clean_submission_reaches_the_relay() {
        let gateway = mock_gateway();
        let result = gateway.submit_contact(&valid_form(), unhurried()).await;
        assert!(result.success, "unexpected rejection: {:?}", result.error);
        assert!(result.data.is_some());
    }

    #[tokio::test]
    async fn missing_email_is_rejected_before_dispatch() {
        let gateway = mock_gateway();
        let mut form = valid_form();
        form.email = String::new();
        let result = gateway.submit_contact(&form, unhurried()).await;
        assert!(!result.success);
        let field_errors = result.field_errors.expect("validation errors");
        assert!(field_errors.contains_key("email"));
        // The mock relay echoes payloads; no data means it was never reached.
        assert!(result.data.is_none());
    }

    #[tokio::test]
    async fn honeypot_submissions_get_a_fake_success() {
        let gateway = mock_gateway();
        let mut form = valid_form();
        form.website = Some("https://definitely-a-bot.example".to_string());
        let result = gateway.submit_contact(&form, unhurried()).await;
        assert!(result.success);
        // Success-shaped, but the relay never ran: no echoed payload.
        let data = result.data.expect("fake body");
        assert!(data.get("data").is_none());
    }

    #[tokio::test]
    async fn too_fast_submissions_are_rejected() {
        let gateway = mock_gateway();
        let timing = FormTiming {
            loaded_at_ms: 1_700_000_000_000,
            submitted_at_ms: 1_700_000_001_000,
        };
        let result = gateway.submit_contact(&valid_form(), timing).await;
        assert!(!result.success);
        assert!(result.error.expect("rejection message").contains("moment"));
    }

    #[tokio::test]
    async fn fourth_attempt_in_window_is_rate_limited() {
        let gateway = mock_gateway();
        for _ in 0..3 {
            let result = gateway.submit_contact(&valid_form(), unhurried()).await;
            assert!(result.success);
        }
        let result = gateway.submit_contact(&valid_form(), unhurried()).await;
        assert!(!result.success);
        assert!(result.retry_after_seconds.is_some());

        gateway.reset_limits();
        let result = gateway.submit_contact(&valid_form(), unhurried()).await;
        assert!(result.success);
    }

    #[tokio::test]
    async fn spam_messages_are_rejected_with_reasons_logged() {
        let gateway = mock_gateway();
        let mut form = valid_form();
        form.message =
            "FREE MONEY click here https://a.x https://b.x https://c.x https://d.x".to_string();
        let result = gateway.submit_contact(&form, unhurried()).await;
        assert!(!result.success);
        assert!(result
            .error
            .expect("rejection message")
            .contains("suspicious"));
    }

    #[tokio::test]
    async fn sweeper_handle_shuts_down_cleanly() {
        let gateway = mock_gateway();
        let sweeper = gateway.start_sweeper(Duration::from_millis(5));
        tokio::time::sleep(Duration::from_millis(15)).await;
        sweeper.shutdown();
    }
}
