//! Log Redaction Layer
//!
//! Scrubs API keys and bearer tokens from strings before they are logged or shown.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[A-Za-z0-9_\-]{20,})|(Bearer\s+[A-Za-z0-9\-\._~+/]+=*)").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]").to_string()
}
