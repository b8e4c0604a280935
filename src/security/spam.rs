use once_cell::sync::Lazy;
use regex::Regex;

static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)https?://[^\s]+").unwrap());

// Case-insensitive substring matches; multi-word entries catch the common
// phrasing rather than attempting stemming.
const SPAM_KEYWORDS: &[&str] = &[
    "viagra",
    "cialis",
    "casino",
    "lottery",
    "winner",
    "congratulations",
    "click here",
    "buy now",
    "limited time",
    "act now",
    "free money",
    "make money fast",
    "work from home",
    "weight loss",
    "crypto",
    "bitcoin",
];

const MAX_URLS: usize = 3;
const CAPS_RATIO_LIMIT: f64 = 0.5;
const CAPS_MIN_LEN: usize = 20;
const SYMBOL_RATIO_LIMIT: f64 = 0.3;
const MAX_CHAR_RUN: usize = 10;

/// Outcome of a spam scan. Every matching reason is reported, not just the
/// first, so the caller can log the full picture.
#[derive(Debug, Clone)]
pub struct SpamAnalysis {
    pub is_suspicious: bool,
    pub reasons: Vec<String>,
}

impl SpamAnalysis {
    fn from_reasons(reasons: Vec<String>) -> Self {
        Self {
            is_suspicious: !reasons.is_empty(),
            reasons,
        }
    }
}

/// Heuristic spam detector for free-text message fields.
#[derive(Clone)]
pub struct SpamDetector {
    url_regex: Regex,
}

impl Default for SpamDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SpamDetector {
    pub fn new() -> Self {
        Self {
            url_regex: URL_REGEX.clone(),
        }
    }

    /// Scan `text` for spam-like patterns.
    ///
    /// Flags: more than three URLs, any known spam keyword, a
    /// capitalization ratio above 0.5 on text longer than 20 characters, a
    /// symbol ratio above 0.3, or any character repeated eleven or more
    /// times in a row.
    pub fn analyze(&self, text: &str) -> SpamAnalysis {
        let mut reasons = Vec::new();

        let url_count = self.url_regex.find_iter(text).count();
        if url_count > MAX_URLS {
            reasons.push(format!("Too many URLs detected ({url_count} found)"));
        }

        let lowercase = text.to_lowercase();
        let found: Vec<&str> = SPAM_KEYWORDS
            .iter()
            .copied()
            .filter(|keyword| lowercase.contains(keyword))
            .collect();
        if !found.is_empty() {
            reasons.push(format!("Spam keywords detected: {}", found.join(", ")));
        }

        let total_chars = text.chars().count();
        if total_chars > CAPS_MIN_LEN {
            let caps = text.chars().filter(|c| c.is_ascii_uppercase()).count();
            if caps as f64 / total_chars as f64 > CAPS_RATIO_LIMIT {
                reasons.push("Excessive capitalization".to_string());
            }
        }

        if total_chars > 0 {
            let symbols = text
                .chars()
                .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
                .count();
            if symbols as f64 / total_chars as f64 > SYMBOL_RATIO_LIMIT {
                reasons.push("Excessive special characters".to_string());
            }
        }

        if has_excessive_repetition(text) {
            reasons.push("Excessive character repetition".to_string());
        }

        SpamAnalysis::from_reasons(reasons)
    }
}

fn has_excessive_repetition(text: &str) -> bool {
    let mut prev: Option<char> = None;
    let mut run = 0usize;

    for ch in text.chars() {
        if Some(ch) == prev {
            run += 1;
            if run > MAX_CHAR_RUN {
                return true;
            }
        } else {
            prev = Some(ch);
            run = 1;
        }
    }

    false
}
