//! Client-side form protection and relay submission.
//!
//! This crate is the non-presentational core of a static marketing site:
//! it sanitizes and validates visitor input, screens out automated
//! submitters (honeypot, timing, rate limiting, spam heuristics), and
//! relays accepted payloads to a third-party form service over HTTP.
//!
//! The two halves are usable independently. [`security`] holds pure
//! heuristics plus the in-memory rate-limit ledger; [`service`] holds the
//! provider-polymorphic submission adapter. [`pipeline::FormGateway`]
//! composes them into the check ordering a form UI needs: honeypot,
//! timing, burst, sliding window, validation, dispatch.
//!
//! Every check here is advisory. There is no backend in scope, so a
//! determined caller can always POST to the relay endpoint directly; the
//! goal is to keep casual abuse and scripted noise out of the inbox.

pub mod config;
pub mod models;
pub mod pipeline;
pub mod security;
pub mod service;

pub use config::{ConfigStatus, FormServiceConfig, FormServiceKind};
pub use models::{
    CareerApplication, ContactForm, ResumeAttachment, SubmissionResult, ValidationResult,
};
pub use pipeline::{FormGateway, FormTiming, GatewayPolicy};
pub use security::{
    generate_form_token, is_honeypot_filled, is_suspiciously_fast, sanitize_input, validate_email,
    RateLimitStore, SpamDetector,
};
pub use service::{FormService, SubmitError};
