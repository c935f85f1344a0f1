//! Basic usage example for keyroute
//!
//! Registers a personal and a shared key in memory and routes one request.
//! Needs real Gemini keys:
//!
//! ```bash
//! PERSONAL_KEY=... SHARED_KEY=... cargo run --example basic_usage
//! ```

use anyhow::Context;
use keyroute_core::{
    ApiSecret, CredentialStore, EngineConfig, GeminiProvider, GenerationRequest,
    InMemoryCredentialStore, KeyRouter, NewCredential, StaticSystemConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("🔑 keyroute example");
    println!("===================");

    let config = EngineConfig::load_from_env()?;
    let store = Arc::new(InMemoryCredentialStore::new());

    let personal = std::env::var("PERSONAL_KEY").context("PERSONAL_KEY not set")?;
    store
        .insert_credential(NewCredential::personal("alice", ApiSecret::new(personal)))
        .await?;
    if let Ok(shared) = std::env::var("SHARED_KEY") {
        store
            .insert_credential(NewCredential::global(ApiSecret::new(shared)).with_label("team"))
            .await?;
    }

    let router = KeyRouter::from_config(
        &config,
        store.clone(),
        Arc::new(StaticSystemConfig::empty()),
        Arc::new(GeminiProvider::new(&config.provider)?),
    );

    let request = GenerationRequest::new("Write a haiku about key rotation");
    let output = router.generate("alice", &request).await?;

    println!("\n📝 {}", output.text);
    println!(
        "\n📊 model={} scope={} attempts={}",
        output.model, output.scope, output.attempts
    );

    println!("\n📋 Credential state:");
    for record in store.list_credentials().await? {
        println!(
            "   {} [{}] status={} uses={}",
            record.id,
            record.scope(),
            record.status,
            record.usage_count
        );
    }
    Ok(())
}
