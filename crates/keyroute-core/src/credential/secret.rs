//! Secret wrapper for API keys

use std::fmt;
use zeroize::Zeroizing;

/// An API key or other credential secret.
///
/// The inner buffer is wiped on drop and the value never appears in `Debug`
/// or `Display` output. Call [`ApiSecret::expose`] at the point of use.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiSecret(Zeroizing<String>);

impl ApiSecret {
    /// Wrap a secret value
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Wrap a secret value, treating blank input as absent
    pub fn non_empty(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self::new(value.trim()))
        }
    }

    /// Borrow the raw secret
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Masked form for display (e.g., "AIz...k3Xq9w")
    pub fn masked(&self) -> String {
        let count = self.0.chars().count();
        if count > 8 {
            let prefix: String = self.0.chars().take(3).collect();
            let suffix: String = self.0.chars().skip(count - 6).collect();
            format!("{}...{}", prefix, suffix)
        } else {
            "*".repeat(count)
        }
    }
}

impl fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiSecret([REDACTED])")
    }
}

impl fmt::Display for ApiSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}
