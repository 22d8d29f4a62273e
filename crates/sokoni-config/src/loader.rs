// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sokoni.toml` > `~/.config/sokoni/sokoni.toml` > `/etc/sokoni/sokoni.toml`
//! with environment variable overrides via `SOKONI_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SokoniConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sokoni/sokoni.toml` (system-wide)
/// 3. `~/.config/sokoni/sokoni.toml` (user XDG config)
/// 4. `./sokoni.toml` (local directory)
/// 5. `SOKONI_*` environment variables
pub fn load_config() -> Result<SokoniConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SokoniConfig::default()))
        .merge(Toml::file("/etc/sokoni/sokoni.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("sokoni/sokoni.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("sokoni.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<SokoniConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SokoniConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SokoniConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SokoniConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `SOKONI_WHATSAPP_API_TOKEN`
/// must map to `whatsapp.api_token`, not `whatsapp.api.token`.
fn env_provider() -> Env {
    Env::prefixed("SOKONI_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: SOKONI_WHATSAPP_API_TOKEN -> "whatsapp_api_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("bot_", "bot.", 1)
            .replacen("whatsapp_", "whatsapp.", 1)
            .replacen("responder_", "responder.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("store_", "store.", 1);
        mapped.into()
    })
}
