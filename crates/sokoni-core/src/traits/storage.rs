// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the persistence backend.

use async_trait::async_trait;

use crate::error::SokoniError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Contact, LogEntry};

/// Adapter for the persistence backend.
///
/// Counter mutations (`record_outbound_sent`, `adjust_engagement`) must be
/// atomic at the storage layer: the pipeline performs no read-modify-write
/// of its own, so two concurrent handlers for the same contact cannot
/// under- or over-count.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, PRAGMAs).
    async fn initialize(&self) -> Result<(), SokoniError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), SokoniError>;

    // --- Contact operations ---

    async fn find_contact_by_address(
        &self,
        address: &str,
    ) -> Result<Option<Contact>, SokoniError>;

    async fn get_contact(&self, id: &str) -> Result<Option<Contact>, SokoniError>;

    async fn create_contact(&self, contact: &Contact) -> Result<(), SokoniError>;

    /// Sets the terminal opted-out flag. Never unset by this subsystem.
    async fn mark_opted_out(&self, id: &str) -> Result<(), SokoniError>;

    /// Records the timestamp of the contact's most recent inbound message.
    async fn touch_last_interaction(&self, id: &str, at: &str) -> Result<(), SokoniError>;

    /// Advances the daily send counter: resets to 1 when `last_message_date`
    /// differs from `today` (`YYYY-MM-DD`), increments otherwise. Atomic.
    async fn record_outbound_sent(&self, id: &str, today: &str) -> Result<(), SokoniError>;

    /// Applies a signed engagement delta, clamped to [0, 100] inside the
    /// update. Returns the new score.
    async fn adjust_engagement(&self, id: &str, delta: i64) -> Result<i64, SokoniError>;

    /// Bumps the contact-reminder counter and date.
    async fn record_contact_reminder(
        &self,
        id: &str,
        today: &str,
    ) -> Result<(), SokoniError>;

    // --- Message log operations ---

    /// Appends one immutable log row.
    async fn append_log(&self, entry: &LogEntry) -> Result<(), SokoniError>;

    /// Returns the contact's most recent `limit` log rows in chronological
    /// order (oldest first).
    async fn recent_log_for_contact(
        &self,
        id: &str,
        limit: i64,
    ) -> Result<Vec<LogEntry>, SokoniError>;

    /// Counts outbound log rows with `created_at >= since` (UTC timestamp
    /// string). Backs the global daily send ceiling.
    async fn count_outbound_since(&self, since: &str) -> Result<i64, SokoniError>;
}
