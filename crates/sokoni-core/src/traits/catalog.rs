// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog capability the responder's tool calls dispatch against.
//!
//! Passed into the responder as a typed interface so the generation backend
//! and the tool implementations can vary independently.

use async_trait::async_trait;

use crate::error::SokoniError;
use crate::types::{ProductHit, StoreDetails};

/// Storefront catalog operations exposed to the responder.
#[async_trait]
pub trait CatalogTools: Send + Sync {
    /// Full-text product search.
    async fn search(&self, query: &str) -> Result<Vec<ProductHit>, SokoniError>;

    /// Lists the store's product categories.
    async fn list_categories(&self) -> Result<Vec<String>, SokoniError>;

    /// Returns the currently discounted products.
    async fn hot_deals(&self) -> Result<Vec<ProductHit>, SokoniError>;

    /// Returns storefront identity (name, address, hours, phone).
    async fn store_details(&self) -> Result<StoreDetails, SokoniError>;
}
