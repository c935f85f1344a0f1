//! CLI commands

pub mod config;
pub mod generate;
pub mod keys;
pub mod system;

use crate::console::CliConsole;
use anyhow::Context as _;
use keyroute_core::{EngineConfig, JsonFileCredentialStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Configuration and backends shared by every command
pub struct Context {
    pub config: EngineConfig,
    pub store: Arc<JsonFileCredentialStore>,
    pub console: CliConsole,
}

impl Context {
    /// Load configuration from the environment, applying CLI overrides
    pub fn load(credentials_file: Option<PathBuf>, verbose: bool) -> anyhow::Result<Self> {
        let mut config = EngineConfig::load_from_env().context("Failed to load configuration")?;
        if let Some(path) = credentials_file {
            config.credentials_file = path;
        }

        debug!(path = %config.credentials_file.display(), "opening credential store");
        let store = Arc::new(JsonFileCredentialStore::new(config.credentials_file.clone()));
        let console = CliConsole::new(verbose);
        console.info(&format!("Credentials file: {}", store.path().display()));

        Ok(Self {
            config,
            store,
            console,
        })
    }
}
