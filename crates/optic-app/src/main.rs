//! Optic application binary - composition root.
//!
//! Ties together all Optic crates into a single executable:
//! 1. Load configuration from TOML (with CLI/env overrides)
//! 2. Build the knowledge resolver (summary lookup + search fallback)
//! 3. Assemble the answer source chain in priority order
//! 4. Create the Q&A orchestrator and the chat-completion proxy
//! 5. Start the axum REST API server

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use optic_api::{routes, AppState, QaProxy};
use optic_chat::{
    AnswerChain, AnswerSource, AssistantSource, FallbackSource, InstantAnswerSource,
    QaOrchestrator, SummarySource,
};
use optic_core::config::OpticConfig;
use optic_knowledge::instant::DuckDuckGoClient;
use optic_knowledge::lookup::WikiLookup;
use optic_knowledge::resolver::KnowledgeResolver;

mod cli;

use cli::CliArgs;

/// Assemble the answer source chain in priority order.
///
/// The assistant tier is only present when an endpoint is configured;
/// the remaining tiers are always wired.
fn build_chain(client: &reqwest::Client, config: &OpticConfig) -> AnswerChain {
    let mut sources: Vec<Box<dyn AnswerSource>> = Vec::new();

    match AssistantSource::from_config(client.clone(), &config.assistant) {
        Some(assistant) => {
            tracing::info!("Assistant tier enabled");
            sources.push(Box::new(assistant));
        }
        None => tracing::info!("No assistant endpoint configured, tier skipped"),
    }

    let instant = DuckDuckGoClient::new(client.clone(), config.instant_answer.clone());
    sources.push(Box::new(InstantAnswerSource::new(Arc::new(instant))));
    sources.push(Box::new(SummarySource));
    sources.push(Box::new(FallbackSource));

    AnswerChain::new(sources)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = OpticConfig::load_or_default(&config_file);
    config.general.port = args.resolve_port(config.general.port);
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Optic v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Shared HTTP client for all outbound calls.
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()?;

    // Knowledge resolver.
    let lookup = WikiLookup::new(client.clone(), config.knowledge.clone());
    let resolver = KnowledgeResolver::new(Arc::new(lookup));

    // Answer chain and orchestrator.
    let chain = build_chain(&client, &config);
    let orchestrator = QaOrchestrator::new(resolver, chain, config.chat.clone());

    // Completion proxy; the credential comes from the configured env var.
    let api_key = std::env::var(&config.proxy.api_key_env).ok();
    if api_key.is_none() {
        tracing::warn!(
            var = %config.proxy.api_key_env,
            "Upstream API key not set, /qa will return errors"
        );
    }
    let proxy = QaProxy::new(client, &config.proxy, api_key);

    // API server.
    let state = AppState::new(orchestrator, proxy, config);
    routes::start_server(state).await?;

    Ok(())
}
