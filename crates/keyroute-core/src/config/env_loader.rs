//! Environment variable-based configuration loading

use super::EngineConfig;
use crate::credential::ApiSecret;
use crate::error::{RouteError, RouteResult};
use std::path::PathBuf;

/// Environment variable names read by [`EngineConfig::load_from_env`]
pub mod env_vars {
    pub const MODELS: &str = "KEYROUTE_MODELS";
    pub const FALLBACK_API_KEY: &str = "KEYROUTE_FALLBACK_API_KEY";
    pub const BASE_URL: &str = "KEYROUTE_BASE_URL";
    pub const CONNECT_TIMEOUT_SECS: &str = "KEYROUTE_CONNECT_TIMEOUT_SECS";
    pub const REQUEST_TIMEOUT_SECS: &str = "KEYROUTE_REQUEST_TIMEOUT_SECS";
    pub const CREDENTIALS_FILE: &str = "KEYROUTE_CREDENTIALS_FILE";
}

/// Variables checked, in order, for the process-level fallback key
pub const FALLBACK_KEY_ENV_VARS: [&str; 3] =
    [env_vars::FALLBACK_API_KEY, "GEMINI_API_KEY", "GOOGLE_API_KEY"];

impl EngineConfig {
    /// Load configuration from the process environment
    pub fn load_from_env() -> RouteResult<Self> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> RouteResult<Self> {
        let mut config = EngineConfig::default();
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(models) = var(env_vars::MODELS) {
            let models = parse_model_list(&models);
            if models.is_empty() {
                return Err(RouteError::config_with_context(
                    format!("{} does not name any model", env_vars::MODELS),
                    "Parsing the default model list",
                ));
            }
            config.default_models = models;
        }

        for name in FALLBACK_KEY_ENV_VARS {
            if let Some(secret) = var(name).and_then(ApiSecret::non_empty) {
                config = config.with_fallback_api_key(secret, name);
                break;
            }
        }

        if let Some(base_url) = var(env_vars::BASE_URL) {
            config.provider.base_url = base_url.trim().to_string();
        }
        if let Some(value) = var(env_vars::CONNECT_TIMEOUT_SECS) {
            config.provider.connect_timeout_secs =
                parse_secs(env_vars::CONNECT_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = var(env_vars::REQUEST_TIMEOUT_SECS) {
            config.provider.request_timeout_secs =
                parse_secs(env_vars::REQUEST_TIMEOUT_SECS, &value)?;
        }
        if let Some(path) = var(env_vars::CREDENTIALS_FILE) {
            config.credentials_file = PathBuf::from(shellexpand::tilde(path.trim()).into_owned());
        }

        Ok(config)
    }
}

/// Split a comma separated model list, dropping blanks
pub(crate) fn parse_model_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|model| !model.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_secs(name: &str, value: &str) -> RouteResult<u64> {
    let secs: u64 = value.trim().parse().map_err(|_| {
        RouteError::config_with_context(
            format!("Invalid {} value", name),
            format!("Parsing '{}' as seconds", value),
        )
    })?;
    if secs == 0 {
        return Err(RouteError::config(format!("{} must be greater than zero", name)));
    }
    Ok(secs)
}
