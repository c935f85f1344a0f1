//! Generation providers
//!
//! A provider turns `(secret, model, prompt)` into generated text. Timeouts
//! and transport retries belong to the provider; the dispatcher only sees
//! the final success or [`ProviderError`].

mod gemini;
mod sanitize;

pub use gemini::GeminiProvider;
pub use sanitize::{redact_secret, sanitize_provider_error_text};

use crate::credential::ApiSecret;
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a provider call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    /// HTTP status or provider-specific numeric code, when known
    pub status_code: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status_code: None,
            message: message.into(),
        }
    }

    pub fn with_status(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            message: message.into(),
        }
    }
}

/// Remote text generation
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Generate text for `prompt` with `model`, authenticating with `secret`
    async fn generate(
        &self,
        secret: &ApiSecret,
        model: &str,
        prompt: &str,
    ) -> Result<String, ProviderError>;
}
