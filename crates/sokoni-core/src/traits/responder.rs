// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Responder adapter trait for the reply-generation backend.

use async_trait::async_trait;

use crate::error::SokoniError;
use crate::traits::adapter::PluginAdapter;
use crate::types::ReplyRequest;

/// Adapter for the generative reply backend.
///
/// Implementations receive the shopper's name, recent conversation history,
/// and the current message, and return the reply text. Tool calls the
/// backend makes (catalog search etc.) are dispatched internally through
/// the [`CatalogTools`](crate::traits::catalog::CatalogTools) capability
/// and are opaque to callers.
#[async_trait]
pub trait ResponderAdapter: PluginAdapter {
    /// Generates a reply for the given request.
    async fn generate(&self, request: ReplyRequest) -> Result<String, SokoniError>;
}
