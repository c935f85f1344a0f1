//! System master key commands

use super::Context;
use anyhow::{Context as _, bail};
use keyroute_core::{ApiSecret, SystemConfigSource};

pub async fn set_key(ctx: &Context, secret: String) -> anyhow::Result<()> {
    let Some(secret) = ApiSecret::non_empty(secret) else {
        bail!("Master key must not be empty");
    };
    let masked = secret.masked();
    ctx.store
        .set_master_secret(Some(secret))
        .await
        .context("Failed to store master key")?;
    ctx.console.success(&format!("Master key set ({masked})"));
    Ok(())
}

pub async fn clear_key(ctx: &Context) -> anyhow::Result<()> {
    ctx.store
        .set_master_secret(None)
        .await
        .context("Failed to clear master key")?;
    ctx.console.success("Master key cleared");
    Ok(())
}

pub async fn show(ctx: &Context) -> anyhow::Result<()> {
    let master = ctx
        .store
        .master_secret()
        .await
        .context("Failed to read system configuration")?;

    ctx.console.print_header("System");
    match master {
        Some(secret) => ctx.console.print_field("Master key", &secret.masked()),
        None => ctx.console.print_field("Master key", "not set"),
    }
    Ok(())
}
