pub mod bot;
pub mod burst;
pub mod rate_limiter;
pub mod sanitizer;
pub mod spam;
pub mod validator;

pub use bot::{generate_form_token, is_honeypot_filled, is_suspiciously_fast, is_well_formed_token};
pub use burst::BurstLimiter;
pub use rate_limiter::{hash_identifier, RateLimitDecision, RateLimitStore, SweeperHandle};
pub use sanitizer::sanitize_input;
pub use spam::{SpamAnalysis, SpamDetector};
pub use validator::{validate_career, validate_contact, validate_email, validate_phone};
