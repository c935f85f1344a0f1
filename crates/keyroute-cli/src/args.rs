//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "keyroute")]
#[command(about = "Route AI generation requests across a rotating pool of API keys")]
#[command(
    long_about = r#"keyroute - route AI generation requests across a rotating pool of API keys

USAGE:
  keyroute generate --requester <ID> "prompt"   # Generate text
  keyroute keys list                            # List stored credentials
  keyroute keys add --secret <KEY> --global     # Add a shared credential
  keyroute system set-key <KEY>                 # Set the master key
  keyroute config show                          # Show effective configuration"#
)]
#[command(version)]
pub struct Cli {
    /// Credentials file (overrides KEYROUTE_CREDENTIALS_FILE)
    #[arg(long, global = true)]
    pub credentials_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate text for a requester
    Generate(GenerateArgs),

    /// Manage stored credentials
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },

    /// Manage the system master key
    System {
        #[command(subcommand)]
        action: SystemAction,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Clone)]
pub struct GenerateArgs {
    /// Identity whose personal credentials are tried first
    #[arg(long)]
    pub requester: String,

    /// Model to try; repeat for an ordered list (defaults to configured models)
    #[arg(long = "model", short = 'm')]
    pub models: Vec<String>,

    /// Prompt text
    pub prompt: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Clone)]
pub enum KeysAction {
    /// List every stored credential
    List,

    /// Add a credential
    Add {
        /// API key
        #[arg(long)]
        secret: String,

        /// Owner of a personal credential
        #[arg(long, conflicts_with = "global", required_unless_present = "global")]
        owner: Option<String>,

        /// Share the credential with every requester
        #[arg(long)]
        global: bool,

        /// Human readable label
        #[arg(long)]
        label: Option<String>,
    },

    /// Revoke a credential
    Revoke {
        /// Credential id
        id: String,
    },

    /// Re-enable a credential and mark it active
    Enable {
        /// Credential id
        id: String,
    },
}

#[derive(Subcommand, Clone)]
pub enum SystemAction {
    /// Set the master key used as the system tier
    SetKey {
        /// API key
        secret: String,
    },

    /// Remove the master key
    ClearKey,

    /// Show whether a master key is configured
    Show,
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Display the effective configuration
    Show,
}
