// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sokoni doctor` command implementation.
//!
//! Runs connectivity and configuration checks without starting the bot:
//! storage open + health, bridge reachability, responder credentials.

use std::sync::Arc;

use sokoni_config::model::SokoniConfig;
use sokoni_core::{HealthStatus, PluginAdapter, SokoniError, StorageAdapter};
use sokoni_responder::{LlmResponder, StaticCatalog};
use sokoni_storage::SqliteStorage;
use sokoni_whatsapp::WhatsappBridge;

/// Runs the `sokoni doctor` command.
///
/// Prints one line per check; returns an error when any check failed so the
/// process exits non-zero.
pub async fn run_doctor(config: SokoniConfig) -> Result<(), SokoniError> {
    let mut failures = 0usize;

    println!("sokoni doctor");
    println!("  config: ok (bot.name = {})", config.bot.name);

    // Storage: open, migrate, health check.
    let storage = SqliteStorage::new(config.storage.clone());
    match storage.initialize().await {
        Ok(()) => match storage.health_check().await {
            Ok(HealthStatus::Healthy) => {
                println!("  storage: ok ({})", config.storage.database_path);
            }
            Ok(status) => {
                println!("  storage: degraded ({status:?})");
                failures += 1;
            }
            Err(e) => {
                println!("  storage: FAILED ({e})");
                failures += 1;
            }
        },
        Err(e) => {
            println!("  storage: FAILED ({e})");
            failures += 1;
        }
    }

    // Bridge: construct and probe /health when configured.
    if config.whatsapp.bridge_ws_url.is_some() {
        match WhatsappBridge::new(config.whatsapp.clone()) {
            Ok(bridge) => match bridge.health_check().await {
                Ok(HealthStatus::Healthy) => println!("  whatsapp bridge: ok"),
                Ok(HealthStatus::Unhealthy(reason)) | Ok(HealthStatus::Degraded(reason)) => {
                    println!("  whatsapp bridge: FAILED ({reason})");
                    failures += 1;
                }
                Err(e) => {
                    println!("  whatsapp bridge: FAILED ({e})");
                    failures += 1;
                }
            },
            Err(e) => {
                println!("  whatsapp bridge: FAILED ({e})");
                failures += 1;
            }
        }
    } else {
        println!("  whatsapp bridge: not configured");
    }

    // Responder: credential presence only, no paid API call.
    let catalog = Arc::new(StaticCatalog::from_config(&config.store));
    match LlmResponder::new(&config.responder, catalog) {
        Ok(_) => println!("  responder: ok (model = {})", config.responder.model),
        Err(e) => {
            println!("  responder: FAILED ({e})");
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(SokoniError::Internal(format!(
            "{failures} doctor check(s) failed"
        )));
    }
    println!("all checks passed");
    Ok(())
}
