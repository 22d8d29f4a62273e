// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed tool dispatch for the completion backend.
//!
//! The model's tool calls are parsed into [`ToolName`] and dispatched
//! against the injected [`CatalogTools`] capability; unknown names come
//! back as errors instead of silently matching strings.

use std::str::FromStr;

use serde_json::json;
use sokoni_core::{CatalogTools, SokoniError};
use strum::{Display, EnumString};

use crate::types::ToolDefinition;

/// The tools exposed to the completion backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ToolName {
    Search,
    ListCategories,
    HotDeals,
    StoreDetails,
}

/// Tool definitions advertised in every completion request.
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: ToolName::Search.to_string(),
            description: "Search the store catalog by product name or category.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search terms"}
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: ToolName::ListCategories.to_string(),
            description: "List the store's product categories.".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        },
        ToolDefinition {
            name: ToolName::HotDeals.to_string(),
            description: "List products currently on sale.".to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        },
        ToolDefinition {
            name: ToolName::StoreDetails.to_string(),
            description: "Get the store's name, address, opening hours, and phone number."
                .to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        },
    ]
}

/// Dispatches one tool call and serializes its result for the model.
pub async fn dispatch(
    catalog: &dyn CatalogTools,
    name: &str,
    input: &serde_json::Value,
) -> Result<String, SokoniError> {
    let tool = ToolName::from_str(name).map_err(|_| SokoniError::Responder {
        message: format!("backend requested unknown tool `{name}`"),
        source: None,
    })?;

    let result = match tool {
        ToolName::Search => {
            let query = input
                .get("query")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            serde_json::to_value(catalog.search(query).await?)
        }
        ToolName::ListCategories => serde_json::to_value(catalog.list_categories().await?),
        ToolName::HotDeals => serde_json::to_value(catalog.hot_deals().await?),
        ToolName::StoreDetails => serde_json::to_value(catalog.store_details().await?),
    }
    .map_err(|e| SokoniError::Internal(format!("failed to serialize tool result: {e}")))?;

    Ok(result.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use sokoni_config::model::{ProductConfig, StoreConfig};

    fn test_catalog() -> StaticCatalog {
        StaticCatalog::from_config(&StoreConfig {
            name: "Mama Njeri Electronics".to_string(),
            address: "Moi Avenue, Nairobi".to_string(),
            opening_hours: "Mon-Sat 8am-6pm".to_string(),
            phone: "+254700000001".to_string(),
            products: vec![
                ProductConfig {
                    name: "Solar lantern".to_string(),
                    price: "KES 1,200".to_string(),
                    category: "solar".to_string(),
                    url: None,
                    on_sale: true,
                },
                ProductConfig {
                    name: "Phone charger".to_string(),
                    price: "KES 450".to_string(),
                    category: "accessories".to_string(),
                    url: None,
                    on_sale: false,
                },
            ],
        })
    }

    #[test]
    fn tool_names_round_trip_snake_case() {
        assert_eq!(ToolName::ListCategories.to_string(), "list_categories");
        assert_eq!(ToolName::from_str("hot_deals").unwrap(), ToolName::HotDeals);
        assert!(ToolName::from_str("delete_everything").is_err());
    }

    #[test]
    fn definitions_cover_every_tool() {
        let defs = definitions();
        assert_eq!(defs.len(), 4);
        for def in &defs {
            assert!(ToolName::from_str(&def.name).is_ok());
        }
    }

    #[tokio::test]
    async fn dispatch_search_returns_matching_products() {
        let catalog = test_catalog();
        let result = dispatch(&catalog, "search", &json!({"query": "lantern"}))
            .await
            .unwrap();
        assert!(result.contains("Solar lantern"));
        assert!(!result.contains("Phone charger"));
    }

    #[tokio::test]
    async fn dispatch_unknown_tool_errors() {
        let catalog = test_catalog();
        let err = dispatch(&catalog, "drop_tables", &json!({})).await.unwrap_err();
        assert!(err.to_string().contains("unknown tool"));
    }

    #[tokio::test]
    async fn dispatch_store_details_serializes_identity() {
        let catalog = test_catalog();
        let result = dispatch(&catalog, "store_details", &json!({})).await.unwrap();
        assert!(result.contains("Mama Njeri Electronics"));
        assert!(result.contains("Moi Avenue"));
    }
}
