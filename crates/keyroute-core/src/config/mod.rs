//! Engine configuration
//!
//! Configuration comes from environment variables (the CLI additionally
//! loads a `.env` file first). See [`EngineConfig::load_from_env`].

mod defaults;
mod env_loader;

pub use defaults::{DEFAULT_BASE_URL, DEFAULT_MODELS};
pub use env_loader::{FALLBACK_KEY_ENV_VARS, env_vars};

use crate::credential::ApiSecret;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// HTTP settings for the generation provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: defaults::CONNECTION_TIMEOUT_SECS,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ProviderSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Process-wide engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Ordered models tried when a request does not name its own
    pub default_models: Vec<String>,
    /// Process-level key used only when sourcing finds nothing
    #[serde(skip)]
    pub fallback_api_key: Option<ApiSecret>,
    /// Environment variable the fallback key was read from
    #[serde(skip)]
    pub fallback_key_origin: Option<String>,
    pub provider: ProviderSettings,
    pub credentials_file: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            fallback_api_key: None,
            fallback_key_origin: None,
            provider: ProviderSettings::default(),
            credentials_file: defaults::default_credentials_file(),
        }
    }
}

impl EngineConfig {
    /// Set the fallback key
    pub fn with_fallback_api_key(mut self, secret: ApiSecret, origin: impl Into<String>) -> Self {
        self.fallback_api_key = Some(secret);
        self.fallback_key_origin = Some(origin.into());
        self
    }

    /// Replace the default model list
    pub fn with_default_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_models = models.into_iter().map(Into::into).collect();
        self
    }
}
