// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sokoni serve` command implementation.
//!
//! Starts the full bot: SQLite storage, the WhatsApp bridge transport with
//! its reconnect supervisor, the completion responder over the config-backed
//! catalog, and the response pipeline runner. Supports graceful shutdown on
//! ctrl-c.

use std::sync::Arc;

use sokoni_config::model::SokoniConfig;
use sokoni_core::clock::{Clock, SystemClock};
use sokoni_core::types::ContactCard;
use sokoni_core::{SokoniError, StorageAdapter, TransportAdapter};
use sokoni_pipeline::{PipelineRunner, ResponsePipeline};
use sokoni_responder::{LlmResponder, StaticCatalog};
use sokoni_storage::SqliteStorage;
use sokoni_whatsapp::WhatsappBridge;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs the `sokoni serve` command.
pub async fn run_serve(config: SokoniConfig) -> Result<(), SokoniError> {
    init_tracing(&config.bot.log_level);
    info!(bot = config.bot.name.as_str(), "starting sokoni serve");

    // Storage.
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage: Arc<dyn StorageAdapter + Send + Sync> = Arc::new(storage);

    // Clock at the configured operating timezone.
    let clock: Arc<dyn Clock> =
        Arc::new(SystemClock::from_offset_hours(config.bot.utc_offset_hours)?);

    // Responder over the config-backed catalog.
    let catalog = Arc::new(StaticCatalog::from_config(&config.store));
    let responder = Arc::new(LlmResponder::new(&config.responder, catalog).map_err(|e| {
        eprintln!(
            "error: completion API key required. Set responder.api_key or ANTHROPIC_API_KEY."
        );
        e
    })?);

    // Transport: connect starts the reconnect supervisor.
    let mut bridge = WhatsappBridge::new(config.whatsapp.clone())?;
    bridge.connect().await?;
    let transport: Arc<dyn TransportAdapter + Send + Sync> = Arc::new(bridge);

    let store_card = ContactCard {
        display_name: config.store.name.clone(),
        phone: config.store.phone.clone(),
    };

    let pipeline = Arc::new(ResponsePipeline::new(
        storage.clone(),
        transport.clone(),
        responder,
        clock,
        store_card,
    ));

    let runner = PipelineRunner::new(transport, storage, pipeline);

    // Graceful shutdown on ctrl-c.
    let cancel = CancellationToken::new();
    let shutdown_trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received");
            shutdown_trigger.cancel();
        }
    });

    runner.run(cancel).await
}

/// Initializes the tracing subscriber from the configured log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
