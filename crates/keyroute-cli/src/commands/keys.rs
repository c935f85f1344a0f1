//! Credential management commands

use super::Context;
use anyhow::{Context as _, bail};
use chrono::{DateTime, Utc};
use colored::*;
use keyroute_core::{
    ApiSecret, CredentialRecord, CredentialStatus, CredentialStore, CredentialUpdate,
    NewCredential,
};
use tracing::debug;

/// Print every stored credential
pub async fn list(ctx: &Context) -> anyhow::Result<()> {
    let records = ctx
        .store
        .list_credentials()
        .await
        .context("Failed to read credentials")?;

    ctx.console.print_header("Credentials");
    if records.is_empty() {
        ctx.console.warn("No credentials stored");
        return Ok(());
    }

    println!(
        "{:<36}  {:<8}  {:<12}  {:<7}  {:<7}  {:>6}  {:<16}  {}",
        "ID", "SCOPE", "OWNER", "STATUS", "ENABLED", "USES", "LAST USED", "LABEL"
    );
    for record in &records {
        print_row(record);
    }
    Ok(())
}

fn print_row(record: &CredentialRecord) {
    let status = match record.status {
        CredentialStatus::Active => format!("{:<7}", record.status).green(),
        CredentialStatus::Revoked => format!("{:<7}", record.status).red(),
    };
    println!(
        "{:<36}  {:<8}  {:<12}  {}  {:<7}  {:>6}  {:<16}  {}",
        record.id,
        record.scope().name(),
        record.owner_id.as_deref().unwrap_or("-"),
        status,
        if record.enabled { "yes" } else { "no" },
        record.usage_count,
        format_timestamp(record.last_used_at),
        record.label.as_deref().unwrap_or(""),
    );
}

fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string())
}

/// Store a new personal or global credential
pub async fn add(
    ctx: &Context,
    secret: String,
    owner: Option<String>,
    global: bool,
    label: Option<String>,
) -> anyhow::Result<()> {
    let Some(secret) = ApiSecret::non_empty(secret) else {
        bail!("Secret must not be empty");
    };
    let masked = secret.masked();

    let mut credential = match (owner, global) {
        (_, true) => NewCredential::global(secret),
        (Some(owner), false) => NewCredential::personal(owner, secret),
        (None, false) => bail!("Either --owner or --global is required"),
    };
    if let Some(label) = label {
        credential = credential.with_label(label);
    }

    let record = ctx
        .store
        .insert_credential(credential)
        .await
        .context("Failed to store credential")?;
    ctx.console.success(&format!(
        "Added {} credential {} ({})",
        record.scope(),
        record.id,
        masked
    ));
    Ok(())
}

/// Mark a credential revoked
pub async fn revoke(ctx: &Context, id: &str) -> anyhow::Result<()> {
    debug!(credential = id, "revoking credential");
    ctx.store
        .apply_update(
            id,
            CredentialUpdate::new().with_status(CredentialStatus::Revoked),
        )
        .await
        .with_context(|| format!("Failed to revoke credential {id}"))?;
    ctx.console.success(&format!("Revoked credential {id}"));
    Ok(())
}

/// Reactivate a revoked or disabled credential
pub async fn enable(ctx: &Context, id: &str) -> anyhow::Result<()> {
    debug!(credential = id, "re-enabling credential");
    ctx.store
        .apply_update(
            id,
            CredentialUpdate::new()
                .with_status(CredentialStatus::Active)
                .with_enabled(true),
        )
        .await
        .with_context(|| format!("Failed to enable credential {id}"))?;
    ctx.console.success(&format!("Enabled credential {id}"));
    Ok(())
}
