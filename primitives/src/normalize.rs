//! Input normalization and field-level checks.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::types::PHONE_DIGITS;

/// Trim and collapse every whitespace run to a single space.
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleaned and lower-cased.
pub fn normalize_email(raw: &str) -> String {
    clean_text(raw).to_lowercase()
}

/// Keep ASCII digits only, truncated to [`PHONE_DIGITS`].
pub fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_DIGITS)
        .collect()
}

/// Length in UTF-16 code units, the unit the browser's minimum-length
/// checks count in. Characters outside the BMP count twice.
pub fn text_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("email pattern is valid")
    })
}

/// Deliberately loose: something, `@`, a dotted domain with a TLD of two or
/// more characters.
pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Absolute `http`/`https` URL with a non-empty host.
pub fn is_valid_http_url(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw) else {
        return false;
    };
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
}
