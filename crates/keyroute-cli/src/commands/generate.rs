//! Text generation command

use super::Context;
use crate::args::GenerateArgs;
use anyhow::Context as _;
use colored::*;
use keyroute_core::{GeminiProvider, GenerationRequest, KeyRouter, RouteError};
use std::sync::Arc;
use tracing::debug;

/// Source credentials for the requester and run the request
pub async fn execute(ctx: &Context, args: GenerateArgs) -> anyhow::Result<()> {
    let provider =
        GeminiProvider::new(&ctx.config.provider).context("Failed to create Gemini provider")?;
    let router = KeyRouter::from_config(
        &ctx.config,
        ctx.store.clone(),
        ctx.store.clone(),
        Arc::new(provider),
    );

    debug!(
        requester = %args.requester,
        models = ?args.models,
        "routing generation request"
    );
    let request = GenerationRequest::new(args.prompt).with_models(args.models);

    let output = router
        .generate(&args.requester, &request)
        .await
        .map_err(|e| with_hint(&args.requester, e))?;

    if args.json {
        let value = serde_json::json!({
            "text": output.text,
            "model": output.model,
            "scope": output.scope.name(),
            "credential_id": output.credential_id,
            "attempts": output.attempts,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", output.text);
    let source = match &output.credential_id {
        Some(id) => format!("{} credential {}", output.scope, id),
        None => format!("{} credential", output.scope),
    };
    eprintln!(
        "{}",
        format!(
            "model {} via {} after {} attempt(s)",
            output.model, source, output.attempts
        )
        .dimmed()
    );
    Ok(())
}

/// Attach an operator hint to routing failures that have an obvious fix
fn with_hint(requester: &str, error: RouteError) -> anyhow::Error {
    match error {
        RouteError::NoCredentialsAvailable => anyhow::Error::from(error).context(format!(
            "No credentials available for '{}'; add one with `keyroute keys add` \
             or set GEMINI_API_KEY",
            requester
        )),
        other => other.into(),
    }
}
