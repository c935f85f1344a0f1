//! keyroute CLI
//!
//! Operator front end for the keyroute engine.
//!
//! ```bash
//! keyroute keys add --secret "$KEY" --owner alice --label laptop
//! keyroute keys add --secret "$SHARED" --global
//! keyroute generate --requester alice "Summarize this changelog"
//! keyroute keys list
//! ```
//!
//! Configuration is read from the environment (and a `.env` file in the
//! working directory). Set `RUST_LOG=keyroute_core=debug` or pass `-v` to see
//! every attempt.

mod args;
mod commands;
mod console;
mod router;

use args::Cli;
use clap::Parser;
use console::CliConsole;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Missing .env is not an error
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = router::route(cli).await {
        CliConsole::new(false).error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
