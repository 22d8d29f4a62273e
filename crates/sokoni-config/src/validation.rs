// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as offset ranges, non-empty paths, and URL schemes.

use crate::diagnostic::ConfigError;
use crate::model::SokoniConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SokoniConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate database_path is not empty
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate timezone offset range
    if !(-12..=14).contains(&config.bot.utc_offset_hours) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.utc_offset_hours must be within [-12, 14], got {}",
                config.bot.utc_offset_hours
            ),
        });
    }

    // Validate bridge URLs carry the expected schemes when set
    if let Some(ws_url) = &config.whatsapp.bridge_ws_url
        && !(ws_url.starts_with("ws://") || ws_url.starts_with("wss://"))
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "whatsapp.bridge_ws_url must be a ws:// or wss:// URL, got `{ws_url}`"
            ),
        });
    }

    if let Some(api_url) = &config.whatsapp.bridge_api_url
        && !(api_url.starts_with("http://") || api_url.starts_with("https://"))
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "whatsapp.bridge_api_url must be an http:// or https:// URL, got `{api_url}`"
            ),
        });
    }

    // Validate responder limits
    if config.responder.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "responder.max_tokens must be greater than 0".to_string(),
        });
    }

    // Validate catalog entries have names and prices
    for (i, product) in config.store.products.iter().enumerate() {
        if product.name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("store.products[{i}].name must not be empty"),
            });
        }
        if product.price.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("store.products[{i}].price must not be empty"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductConfig;

    #[test]
    fn default_config_validates() {
        let config = SokoniConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = SokoniConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))));
    }

    #[test]
    fn out_of_range_offset_fails_validation() {
        let mut config = SokoniConfig::default();
        config.bot.utc_offset_hours = 20;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("utc_offset_hours"))));
    }

    #[test]
    fn http_ws_url_fails_validation() {
        let mut config = SokoniConfig::default();
        config.whatsapp.bridge_ws_url = Some("http://localhost:3000/ws".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("bridge_ws_url"))));
    }

    #[test]
    fn nameless_product_fails_validation() {
        let mut config = SokoniConfig::default();
        config.store.products.push(ProductConfig {
            name: "  ".to_string(),
            price: "KES 100".to_string(),
            category: String::new(),
            url: None,
            on_sale: false,
        });
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("products[0].name"))));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = SokoniConfig::default();
        config.bot.utc_offset_hours = 3;
        config.whatsapp.bridge_ws_url = Some("ws://127.0.0.1:3000/events".to_string());
        config.whatsapp.bridge_api_url = Some("http://127.0.0.1:3000".to_string());
        config.storage.database_path = "/tmp/test.db".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
