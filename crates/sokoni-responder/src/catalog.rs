// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config-backed static catalog.
//!
//! Small storefronts keep their catalog in `sokoni.toml`; this adapter
//! serves it through the [`CatalogTools`] capability. Stores with a real
//! inventory system implement the trait against that instead.

use async_trait::async_trait;
use sokoni_config::model::StoreConfig;
use sokoni_core::types::{ProductHit, StoreDetails};
use sokoni_core::{CatalogTools, SokoniError};

/// One in-memory catalog entry.
#[derive(Debug, Clone)]
struct CatalogEntry {
    name: String,
    price: String,
    category: String,
    url: Option<String>,
    on_sale: bool,
}

/// In-memory catalog fed from the `[store]` config section.
pub struct StaticCatalog {
    details: StoreDetails,
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            details: StoreDetails {
                name: config.name.clone(),
                address: config.address.clone(),
                opening_hours: config.opening_hours.clone(),
                phone: config.phone.clone(),
            },
            entries: config
                .products
                .iter()
                .map(|p| CatalogEntry {
                    name: p.name.clone(),
                    price: p.price.clone(),
                    category: p.category.clone(),
                    url: p.url.clone(),
                    on_sale: p.on_sale,
                })
                .collect(),
        }
    }

    fn to_hit(entry: &CatalogEntry) -> ProductHit {
        ProductHit {
            name: entry.name.clone(),
            price: entry.price.clone(),
            url: entry.url.clone(),
        }
    }
}

#[async_trait]
impl CatalogTools for StaticCatalog {
    async fn search(&self, query: &str) -> Result<Vec<ProductHit>, SokoniError> {
        let needle = query.to_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&needle)
                    || e.category.to_lowercase().contains(&needle)
            })
            .map(Self::to_hit)
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<String>, SokoniError> {
        let mut categories: Vec<String> = self
            .entries
            .iter()
            .map(|e| e.category.clone())
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn hot_deals(&self) -> Result<Vec<ProductHit>, SokoniError> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.on_sale)
            .map(Self::to_hit)
            .collect())
    }

    async fn store_details(&self) -> Result<StoreDetails, SokoniError> {
        Ok(self.details.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sokoni_config::model::ProductConfig;

    fn catalog() -> StaticCatalog {
        StaticCatalog::from_config(&StoreConfig {
            name: "Duka Mjini".to_string(),
            address: "Tom Mboya St".to_string(),
            opening_hours: "daily 9-5".to_string(),
            phone: "+254711000000".to_string(),
            products: vec![
                ProductConfig {
                    name: "Solar lantern".to_string(),
                    price: "KES 1,200".to_string(),
                    category: "solar".to_string(),
                    url: Some("https://duka.example/lantern".to_string()),
                    on_sale: true,
                },
                ProductConfig {
                    name: "Solar panel 50W".to_string(),
                    price: "KES 4,500".to_string(),
                    category: "solar".to_string(),
                    url: None,
                    on_sale: false,
                },
                ProductConfig {
                    name: "Earbuds".to_string(),
                    price: "KES 800".to_string(),
                    category: "audio".to_string(),
                    url: None,
                    on_sale: false,
                },
            ],
        })
    }

    #[tokio::test]
    async fn search_matches_name_and_category() {
        let catalog = catalog();
        let by_name = catalog.search("lantern").await.unwrap();
        assert_eq!(by_name.len(), 1);

        let by_category = catalog.search("SOLAR").await.unwrap();
        assert_eq!(by_category.len(), 2);

        assert!(catalog.search("bicycle").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn categories_are_deduped_and_sorted() {
        let categories = catalog().list_categories().await.unwrap();
        assert_eq!(categories, vec!["audio", "solar"]);
    }

    #[tokio::test]
    async fn hot_deals_filters_on_sale() {
        let deals = catalog().hot_deals().await.unwrap();
        assert_eq!(deals.len(), 1);
        assert_eq!(deals[0].name, "Solar lantern");
    }
}
