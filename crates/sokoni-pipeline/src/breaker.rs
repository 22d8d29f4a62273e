// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account-wide daily send ceiling.
//!
//! The counter is derived, not stored: a count query over outbound log rows
//! since local midnight. Evaluated before any per-user gate so a noisy day
//! cannot be bypassed through per-user budgets.

use std::sync::Arc;

use sokoni_core::clock::{format_utc, Clock};
use sokoni_core::{SokoniError, StorageAdapter};

use crate::limits::GLOBAL_DAILY_LIMIT;

/// Global circuit breaker over today's outbound volume.
pub struct GlobalCircuitBreaker {
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    clock: Arc<dyn Clock>,
}

impl GlobalCircuitBreaker {
    pub fn new(
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { storage, clock }
    }

    /// True while sends are still permitted today.
    ///
    /// Trips (returns false) once today's outbound count reaches the
    /// ceiling. Storage failures propagate to the caller.
    pub async fn is_open(&self) -> Result<bool, SokoniError> {
        let since = format_utc(self.clock.day_start_utc());
        let sent_today = self.storage.count_outbound_since(&since).await?;
        Ok(sent_today < GLOBAL_DAILY_LIMIT)
    }
}
