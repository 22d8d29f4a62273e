// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Sokoni configuration system.

use sokoni_config::diagnostic::suggest_key;
use sokoni_config::model::SokoniConfig;
use sokoni_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_sokoni_config() {
    let toml = r#"
[bot]
name = "test-bot"
log_level = "debug"
utc_offset_hours = 3

[whatsapp]
bridge_ws_url = "ws://127.0.0.1:3000/events"
bridge_api_url = "http://127.0.0.1:3000"
api_token = "secret-token"

[responder]
api_key = "sk-ant-123"
model = "claude-haiku-4-5-20250901"
max_tokens = 512

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[store]
name = "Mama Njeri Electronics"
address = "Moi Avenue, Nairobi"
opening_hours = "Mon-Sat 8am-6pm"
phone = "+254700000001"

[[store.products]]
name = "Solar lantern"
price = "KES 1,200"
category = "solar"
on_sale = true
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.name, "test-bot");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.bot.utc_offset_hours, 3);
    assert_eq!(
        config.whatsapp.bridge_ws_url.as_deref(),
        Some("ws://127.0.0.1:3000/events")
    );
    assert_eq!(config.whatsapp.api_token.as_deref(), Some("secret-token"));
    assert_eq!(config.responder.api_key.as_deref(), Some("sk-ant-123"));
    assert_eq!(config.responder.max_tokens, 512);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.store.name, "Mama Njeri Electronics");
    assert_eq!(config.store.products.len(), 1);
    assert_eq!(config.store.products[0].name, "Solar lantern");
    assert!(config.store.products[0].on_sale);
}

/// Unknown field in [bot] section produces an error.
#[test]
fn unknown_field_in_bot_produces_error() {
    let toml = r#"
[bot]
naem = "test"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    // Figment wraps serde's deny_unknown_fields error
    assert!(
        err_str.contains("unknown field") || err_str.contains("naem"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown field in [whatsapp] section produces an error.
#[test]
fn unknown_field_in_whatsapp_produces_error() {
    let toml = r#"
[whatsapp]
api_tken = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("api_tken"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let toml = "";
    let config = load_config_from_str(toml).expect("empty TOML should use defaults");

    assert_eq!(config.bot.name, "sokoni");
    assert_eq!(config.bot.log_level, "info");
    assert_eq!(config.bot.utc_offset_hours, 0);
    assert!(config.whatsapp.bridge_ws_url.is_none());
    assert!(config.whatsapp.api_token.is_none());
    assert!(config.responder.api_key.is_none());
    assert_eq!(config.responder.model, "claude-haiku-4-5-20250901");
    assert!(config.storage.wal_mode);
    assert_eq!(config.store.name, "Sokoni");
    assert!(config.store.products.is_empty());
}

/// Dot-notation overrides map to whatsapp.api_token
/// (NOT whatsapp.api.token -- the env provider uses explicit section maps).
#[test]
fn dot_notation_overrides_whatsapp_api_token() {
    use figment::{providers::Serialized, Figment};

    let config: SokoniConfig = Figment::new()
        .merge(Serialized::defaults(SokoniConfig::default()))
        .merge(("whatsapp.api_token", "xyz-from-env"))
        .extract()
        .expect("should set api_token via dot notation");

    assert_eq!(config.whatsapp.api_token.as_deref(), Some("xyz-from-env"));
}

/// Override beats TOML for bot.name.
#[test]
fn override_beats_toml_for_bot_name() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let toml_content = r#"
[bot]
name = "from-toml"
"#;

    let config: SokoniConfig = Figment::new()
        .merge(Serialized::defaults(SokoniConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("bot.name", "from-env"))
        .extract()
        .expect("should merge override");

    assert_eq!(config.bot.name, "from-env");
}

/// Validation errors surface through load_and_validate_str.
#[test]
fn validation_errors_surface_through_load_and_validate() {
    let toml = r#"
[bot]
utc_offset_hours = 99
"#;

    let errors = load_and_validate_str(toml).expect_err("offset out of range");
    assert!(!errors.is_empty());
}

/// The suggestion engine works with the real section key sets.
#[test]
fn suggestion_engine_knows_section_keys() {
    let valid = &["bridge_ws_url", "bridge_api_url", "api_token"];
    assert_eq!(
        suggest_key("bridge_ws_uri", valid),
        Some("bridge_ws_url".to_string())
    );
}
