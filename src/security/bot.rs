use rand::rngs::OsRng;
use rand::RngCore;

pub const DEFAULT_MIN_FILL_MS: u64 = 3000;

/// True when the decoy field carries any value.
///
/// The field is present in markup but never rendered, so a human cannot
/// fill it; automated submitters that populate every input reveal
/// themselves here.
pub fn is_honeypot_filled(value: Option<&str>) -> bool {
    value.map_or(false, |v| !v.is_empty())
}

/// True when the form was completed faster than a human plausibly types.
///
/// A submit timestamp at or before the load timestamp also counts as fast;
/// clocks that run backwards are not given the benefit of the doubt.
pub fn is_suspiciously_fast(loaded_at_ms: u64, submitted_at_ms: u64, min_fill_ms: u64) -> bool {
    submitted_at_ms.saturating_sub(loaded_at_ms) < min_fill_ms
}

/// Generate a fresh per-form-load token: 32 random bytes, hex encoded.
///
/// This is a replay and automation deterrent only. Nothing verifies it
/// server-side, so it carries no real CSRF guarantee.
pub fn generate_form_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Check that a token has the shape [`generate_form_token`] produces.
pub fn is_well_formed_token(token: &str) -> bool {
    token.len() == 64 && token.chars().all(|c| c.is_ascii_hexdigit())
}
