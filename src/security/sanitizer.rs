use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

// Inline event-handler attributes that survive tag stripping as plain text,
// e.g. `onclick="alert(1)"` pasted into a message body.
static EVENT_HANDLER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bon\w+\s*=\s*("[^"]*"|'[^']*')"#).unwrap()
});

static URI_SCHEME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:javascript|data):").unwrap());

const MAX_SYMBOL_RUN: usize = 3;

/// Sanitize a single form field.
///
/// Strips HTML tags (script and style blocks lose their contents too),
/// removes inline event-handler attributes and `javascript:`/`data:` URI
/// schemes, and collapses runs of four or more identical symbol characters
/// down to three. Idempotent: sanitizing already-sanitized text is a no-op.
///
/// Whitespace is preserved; callers sanitize on every keystroke and
/// trimming mid-typing would fight the cursor.
pub fn sanitize_input(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let stripped = strip_html(input);

    // Removing one pattern can splice another together (`javascr` +
    // handler + `ipt:`), so both passes loop to a fixpoint.
    let mut current = stripped;
    loop {
        let without_handlers = EVENT_HANDLER_REGEX.replace_all(&current, "");
        let next = URI_SCHEME_REGEX
            .replace_all(&without_handlers, "")
            .into_owned();
        if next == current {
            break;
        }
        current = next;
    }

    collapse_symbol_runs(&current)
}

fn strip_html(input: &str) -> String {
    let drop_with_content: HashSet<&str> = ["script", "style"].iter().copied().collect();
    ammonia::Builder::default()
        .tags(HashSet::new())
        .clean_content_tags(drop_with_content)
        .clean(input)
        .to_string()
}

/// Collapse runs of 4+ identical non-alphanumeric, non-whitespace
/// characters to 3. The regex crate has no backreferences, so this is a
/// plain scan.
fn collapse_symbol_runs(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev: Option<char> = None;
    let mut run = 0usize;

    for ch in input.chars() {
        if Some(ch) == prev {
            run += 1;
        } else {
            prev = Some(ch);
            run = 1;
        }

        if ch.is_alphanumeric() || ch.is_whitespace() || run <= MAX_SYMBOL_RUN {
            out.push(ch);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_html_tags_but_keeps_text() {
        assert_eq!(sanitize_input("Hello <b>world</b>"), "Hello world");
        assert_eq!(sanitize_input("<div><p>nested</p></div>"), "nested");
    }

    #[test]
    fn script_blocks_lose_their_contents() {
        let out = sanitize_input("before<script>alert('xss')</script>after");
        assert_eq!(out, "beforeafter");
        assert!(!out.contains("alert"));
    }

    #[test]
    fn removes_inline_event_handlers_in_plain_text() {
        let out = sanitize_input(r#"onclick="alert('x')" hello"#);
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn removes_uri_schemes() {
        assert_eq!(sanitize_input("javascript:alert(1)"), "alert(1)");
        assert_eq!(sanitize_input("DATA:text/html;x"), "text/html;x");
        // Nested occurrences cannot survive a single call.
        assert_eq!(sanitize_input("javajavascript:script:void(0)"), "void(0)");
    }

    #[test]
    fn collapses_long_symbol_runs() {
        assert_eq!(sanitize_input("wow!!!!!!"), "wow!!!");
        assert_eq!(sanitize_input("???"), "???");
        // Letters and whitespace are never collapsed.
        assert_eq!(sanitize_input("aaaaaa"), "aaaaaa");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(sanitize_input(""), "");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let samples = [
            "plain text with no markup",
            "Hello <b>world</b>!!!!!",
            "<script>alert('x')</script>ok",
            "javajavascript:script:alert(1)",
            r#"<img src=x onerror="alert(1)">"#,
            r#"onclick="alert('x')" javascript:void(0) ------"#,
            "unicode: héllo wörld",
            "  leading and trailing whitespace  ",
        ];
        for sample in samples {
            let once = sanitize_input(sample);
            let twice = sanitize_input(&once);
            assert_eq!(once, twice, "sanitize not idempotent for {sample:?}");
        }
    }
}
