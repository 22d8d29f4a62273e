// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Sokoni WhatsApp storefront assistant.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Sokoni workspace. All adapters
//! implement traits defined here.

pub mod clock;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use clock::{format_utc, Clock, ManualClock, SystemClock};
pub use error::SokoniError;
pub use types::{AdapterType, Direction, HealthStatus, MessageId};

// Re-export all adapter traits at crate root.
pub use traits::{
    CatalogTools, PluginAdapter, ResponderAdapter, StorageAdapter, TransportAdapter,
};
