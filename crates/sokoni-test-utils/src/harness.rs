// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` assembles a complete pipeline stack with mock adapters,
//! temp SQLite, and a manual clock. Provides `deliver()` to drive the full
//! gate sequence in tests.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use sokoni_config::model::StorageConfig;
use sokoni_core::clock::{format_utc, Clock, ManualClock};
use sokoni_core::types::{Contact, ContactCard, InboundMessage};
use sokoni_core::{SokoniError, StorageAdapter};
use sokoni_pipeline::ResponsePipeline;
use sokoni_storage::SqliteStorage;

use crate::mock_responder::MockResponder;
use crate::mock_transport::MockTransport;

/// Default harness instant: a weekday mid-morning, outside quiet hours.
const DEFAULT_NOW: &str = "2026-03-02T09:00:00Z";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    replies: Vec<String>,
    now: DateTime<Utc>,
    offset_hours: i32,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            now: DEFAULT_NOW.parse().expect("valid default instant"),
            offset_hours: 0,
        }
    }

    /// Set mock responder replies.
    pub fn with_replies(mut self, replies: Vec<String>) -> Self {
        self.replies = replies;
        self
    }

    /// Pin the harness clock at the given UTC instant.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Operate the harness clock at a whole-hour UTC offset.
    pub fn with_offset_hours(mut self, hours: i32) -> Self {
        self.offset_hours = hours;
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, SokoniError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| SokoniError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage = SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        });
        storage.initialize().await?;
        let storage: Arc<dyn StorageAdapter + Send + Sync> = Arc::new(storage);

        let transport = Arc::new(MockTransport::new());
        let responder = Arc::new(if self.replies.is_empty() {
            MockResponder::new()
        } else {
            MockResponder::with_replies(self.replies)
        });
        let clock = Arc::new(ManualClock::with_offset(self.now, self.offset_hours));

        let store_card = ContactCard {
            display_name: "Sokoni Test Store".to_string(),
            phone: "+254700000000".to_string(),
        };

        let pipeline = Arc::new(
            ResponsePipeline::new(
                storage.clone(),
                transport.clone(),
                responder.clone(),
                clock.clone(),
                store_card,
            )
            .without_simulated_delay(),
        );

        Ok(TestHarness {
            transport,
            responder,
            storage,
            clock,
            pipeline,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock adapters and temp storage.
pub struct TestHarness {
    /// The mock transport.
    pub transport: Arc<MockTransport>,
    /// The mock reply backend.
    pub responder: Arc<MockResponder>,
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<dyn StorageAdapter + Send + Sync>,
    /// Settable clock driving all day-boundary logic.
    pub clock: Arc<ManualClock>,
    /// The pipeline under test (typing delay disabled).
    pub pipeline: Arc<ResponsePipeline>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Drive one inbound message through the full pipeline.
    pub async fn deliver(&self, address: &str, body: &str) -> Result<(), SokoniError> {
        let msg = InboundMessage {
            id: format!("harness-{}", uuid::Uuid::new_v4()),
            address: address.to_string(),
            push_name: None,
            body: body.to_string(),
            media: None,
            timestamp: format_utc(self.clock.now_utc()),
        };
        self.pipeline.handle_inbound(msg).await
    }

    /// Fetch the contact registered for an address, if any.
    pub async fn contact(&self, address: &str) -> Result<Option<Contact>, SokoniError> {
        self.storage.find_contact_by_address(address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "254700000001@s.whatsapp.net";

    #[tokio::test]
    async fn builder_creates_working_environment() {
        let harness = TestHarness::builder().build().await.unwrap();
        assert!(harness.contact(ADDR).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deliver_registers_contact_and_replies() {
        let harness = TestHarness::builder()
            .with_replies(vec!["karibu!".to_string()])
            .build()
            .await
            .unwrap();

        harness.deliver(ADDR, "hello").await.unwrap();

        let contact = harness.contact(ADDR).await.unwrap().expect("registered");
        assert_eq!(contact.engagement_score, 100);

        let sent = harness.transport.sent_texts().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "karibu!");
        assert_eq!(sent[0].address, ADDR);
    }

    #[tokio::test]
    async fn harnesses_are_isolated() {
        let h1 = TestHarness::builder()
            .with_replies(vec!["h1".to_string()])
            .build()
            .await
            .unwrap();
        let h2 = TestHarness::builder().build().await.unwrap();

        h1.deliver(ADDR, "msg").await.unwrap();
        assert!(h1.contact(ADDR).await.unwrap().is_some());
        assert!(h2.contact(ADDR).await.unwrap().is_none());
    }
}
