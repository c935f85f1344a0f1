//! Provider failure classification

use crate::provider::ProviderError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Message fragments identifying a rejected credential
const PERMANENT_SIGNALS: &[&str] = &[
    "unauthorized",
    "invalid api key",
    "api key not valid",
    "api_key_invalid",
];

/// Message fragments identifying quota or rate-limit exhaustion
const TRANSIENT_SIGNALS: &[&str] = &[
    "rate limit",
    "quota",
    "resource_exhausted",
    "too many requests",
];

// Status codes only count when introduced as one (`HTTP 401`, `status: 429`,
// `"code":401`); bare digits inside ids or byte counts are ignored.
static UNAUTHORIZED_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:http(?:/\d(?:\.\d)?)?|status|code)"?\s*[:=]?\s*401\b"#)
        .expect("valid unauthorized status regex")
});

static RATE_LIMIT_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:http(?:/\d(?:\.\d)?)?|status|code)"?\s*[:=]?\s*429\b"#)
        .expect("valid rate limit status regex")
});

/// Category of a failed provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Quota or rate limit; the credential is healthy
    Transient,
    /// The credential itself was rejected
    Permanent,
    /// Anything unrecognised
    Unknown,
}

impl FailureClass {
    pub fn label(&self) -> &'static str {
        match self {
            FailureClass::Transient => "transient",
            FailureClass::Permanent => "permanent",
            FailureClass::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a provider failure.
///
/// A recognised status code decides on its own; otherwise the message is
/// searched for credential signals first, then quota signals.
pub fn classify(error: &ProviderError) -> FailureClass {
    match error.status_code {
        Some(429) => return FailureClass::Transient,
        Some(401) => return FailureClass::Permanent,
        _ => {}
    }

    let message = error.message.to_lowercase();
    if UNAUTHORIZED_CODE_RE.is_match(&message) || mentions_any(&message, PERMANENT_SIGNALS) {
        FailureClass::Permanent
    } else if RATE_LIMIT_CODE_RE.is_match(&message) || mentions_any(&message, TRANSIENT_SIGNALS) {
        FailureClass::Transient
    } else {
        FailureClass::Unknown
    }
}

fn mentions_any(message: &str, signals: &[&str]) -> bool {
    signals.iter().any(|signal| message.contains(signal))
}
