// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use sokoni_config::model::StorageConfig;
use sokoni_core::types::{Contact, LogEntry};
use sokoni_core::{
    AdapterType, HealthStatus, PluginAdapter, SokoniError, StorageAdapter,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`StorageAdapter::initialize`]
    /// is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, SokoniError> {
        self.db.get().ok_or_else(|| SokoniError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, SokoniError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SokoniError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            db.connection()
                .call(|conn| {
                    conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), SokoniError> {
        let db = Database::open(&self.config.database_path).await?;
        if !self.config.wal_mode {
            db.connection()
                .call(|conn| {
                    conn.pragma_update(None, "journal_mode", "DELETE")?;
                    Ok(())
                })
                .await
                .map_err(crate::database::map_tr_err)?;
        }
        self.db.set(db).map_err(|_| SokoniError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), SokoniError> {
        let db = self.db()?;
        // Checkpoint WAL before close.
        db.connection()
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Contact operations ---

    async fn find_contact_by_address(
        &self,
        address: &str,
    ) -> Result<Option<Contact>, SokoniError> {
        queries::contacts::find_by_address(self.db()?, address).await
    }

    async fn get_contact(&self, id: &str) -> Result<Option<Contact>, SokoniError> {
        queries::contacts::get_contact(self.db()?, id).await
    }

    async fn create_contact(&self, contact: &Contact) -> Result<(), SokoniError> {
        queries::contacts::create_contact(self.db()?, contact).await
    }

    async fn mark_opted_out(&self, id: &str) -> Result<(), SokoniError> {
        queries::contacts::mark_opted_out(self.db()?, id).await
    }

    async fn touch_last_interaction(&self, id: &str, at: &str) -> Result<(), SokoniError> {
        queries::contacts::touch_last_interaction(self.db()?, id, at).await
    }

    async fn record_outbound_sent(&self, id: &str, today: &str) -> Result<(), SokoniError> {
        queries::contacts::record_outbound_sent(self.db()?, id, today).await
    }

    async fn adjust_engagement(&self, id: &str, delta: i64) -> Result<i64, SokoniError> {
        queries::contacts::adjust_engagement(self.db()?, id, delta).await
    }

    async fn record_contact_reminder(
        &self,
        id: &str,
        today: &str,
    ) -> Result<(), SokoniError> {
        queries::contacts::record_contact_reminder(self.db()?, id, today).await
    }

    // --- Message log operations ---

    async fn append_log(&self, entry: &LogEntry) -> Result<(), SokoniError> {
        queries::message_log::append_log(self.db()?, entry).await
    }

    async fn recent_log_for_contact(
        &self,
        id: &str,
        limit: i64,
    ) -> Result<Vec<LogEntry>, SokoniError> {
        queries::message_log::recent_for_contact(self.db()?, id, limit).await
    }

    async fn count_outbound_since(&self, since: &str) -> Result<i64, SokoniError> {
        queries::message_log::count_outbound_since(self.db()?, since).await
    }
}
