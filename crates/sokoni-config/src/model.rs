// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Sokoni assistant.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.
//!
//! Pipeline limits (daily caps, quiet hours, engagement numbers) are fixed
//! compile-time constants in `sokoni-pipeline`, not config keys; this model
//! carries only ambient concerns: identity, credentials, paths, timezone.

use serde::{Deserialize, Serialize};

/// Top-level Sokoni configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SokoniConfig {
    /// Bot identity and behavior settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// WhatsApp bridge transport settings.
    #[serde(default)]
    pub whatsapp: WhatsappConfig,

    /// Reply-generation backend settings.
    #[serde(default)]
    pub responder: ResponderConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Storefront identity and catalog.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Bot identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Operating timezone as a whole-hour UTC offset in [-12, 14].
    ///
    /// Daily counters and quiet hours are evaluated at this offset.
    #[serde(default)]
    pub utc_offset_hours: i32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
            utc_offset_hours: 0,
        }
    }
}

fn default_bot_name() -> String {
    "sokoni".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// WhatsApp bridge transport configuration.
///
/// The bridge is a sidecar speaking the WhatsApp Web protocol; Sokoni
/// consumes its WebSocket event stream and HTTP send API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsappConfig {
    /// WebSocket URL for inbound events. `None` disables the transport.
    #[serde(default)]
    pub bridge_ws_url: Option<String>,

    /// Base HTTP URL for the bridge's send API.
    #[serde(default)]
    pub bridge_api_url: Option<String>,

    /// Bearer token for the bridge API.
    #[serde(default)]
    pub api_token: Option<String>,
}

/// Reply-generation backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResponderConfig {
    /// Completion API key. `None` requires the environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier for reply generation.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens to generate per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
        }
    }
}

fn default_model() -> String {
    "claude-haiku-4-5-20250901".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("sokoni").join("sokoni.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("sokoni.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Storefront identity and catalog configuration.
///
/// Backs the `store_details` tool and the static catalog the responder's
/// `search`/`list_categories`/`hot_deals` tools dispatch against.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Storefront display name, also used in the contact-card nudge.
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub opening_hours: String,

    /// Store's WhatsApp number in international format.
    #[serde(default)]
    pub phone: String,

    /// Catalog entries for the static catalog backend.
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_store_name(),
            address: String::new(),
            opening_hours: String::new(),
            phone: String::new(),
            products: Vec::new(),
        }
    }
}

fn default_store_name() -> String {
    "Sokoni".to_string()
}

/// One catalog entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProductConfig {
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub url: Option<String>,
    /// Included in `hot_deals` results when true.
    #[serde(default)]
    pub on_sale: bool,
}
