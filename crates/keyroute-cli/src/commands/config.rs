//! Configuration inspection

use super::Context;
use keyroute_core::config::FALLBACK_KEY_ENV_VARS;

/// Show the effective configuration with secrets masked
pub fn show(ctx: &Context) -> anyhow::Result<()> {
    let config = &ctx.config;
    let console = &ctx.console;

    console.print_header("Configuration");
    console.print_field("Default models", &config.default_models.join(", "));
    console.print_field("Base URL", &config.provider.base_url);
    console.print_field(
        "Connect timeout",
        &format!("{}s", config.provider.connect_timeout_secs),
    );
    console.print_field(
        "Request timeout",
        &format!("{}s", config.provider.request_timeout_secs),
    );
    console.print_field(
        "Credentials file",
        &config.credentials_file.display().to_string(),
    );

    let fallback = match (&config.fallback_api_key, &config.fallback_key_origin) {
        (Some(secret), Some(origin)) => format!("{} (from {})", secret.masked(), origin),
        (Some(secret), None) => secret.masked(),
        (None, _) => format!("not set (checked {})", FALLBACK_KEY_ENV_VARS.join(", ")),
    };
    console.print_field("Fallback key", &fallback);
    Ok(())
}
