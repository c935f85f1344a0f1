//! Built-in configuration defaults

use std::path::PathBuf;

/// Models tried in order when neither the request nor the environment names any
pub const DEFAULT_MODELS: [&str; 4] = [
    "gemini-2.5-flash",
    "gemini-2.0-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.0-flash-lite",
];

/// Generative Language API endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default connection timeout for provider calls (30 seconds)
pub const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Default request timeout for provider calls (60 seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// `~/.keyroute/credentials.json`, or `./.keyroute/credentials.json` without a home directory
pub fn default_credentials_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".keyroute")
        .join("credentials.json")
}
