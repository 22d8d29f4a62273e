// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock transport adapter for deterministic testing.
//!
//! `MockTransport` implements `TransportAdapter` with injectable inbound
//! events and captured sends for assertion in tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use sokoni_core::clock::format_utc;
use sokoni_core::types::{
    AdapterType, ContactCard, HealthStatus, InboundMessage, MessageId, Presence, Receipt,
    TransportEvent,
};
use sokoni_core::{PluginAdapter, SokoniError, TransportAdapter};

/// A captured outbound text.
#[derive(Debug, Clone)]
pub struct SentText {
    pub address: String,
    pub body: String,
}

/// A mock messaging transport for testing.
///
/// Provides queues in both directions:
/// - **events**: injected via `inject_message()`/`inject_event()`, returned by `next_event()`
/// - **sent**: everything passed to the send methods, retrievable for assertions
pub struct MockTransport {
    events: Arc<Mutex<VecDeque<TransportEvent>>>,
    sent_texts: Arc<Mutex<Vec<SentText>>>,
    sent_cards: Arc<Mutex<Vec<(String, ContactCard)>>>,
    presence_log: Arc<Mutex<Vec<(String, Presence)>>>,
    fail_sends: AtomicBool,
    notify: Arc<Notify>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::new())),
            sent_texts: Arc::new(Mutex::new(Vec::new())),
            sent_cards: Arc::new(Mutex::new(Vec::new())),
            presence_log: Arc::new(Mutex::new(Vec::new())),
            fail_sends: AtomicBool::new(false),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Inject a raw transport event.
    pub async fn inject_event(&self, event: TransportEvent) {
        self.events.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Inject an inbound text message from the given address.
    pub async fn inject_message(&self, address: &str, body: &str) {
        let msg = InboundMessage {
            id: format!("mock-{}", uuid::Uuid::new_v4()),
            address: address.to_string(),
            push_name: None,
            body: body.to_string(),
            media: None,
            timestamp: format_utc(chrono::Utc::now()),
        };
        self.inject_event(TransportEvent::Message(msg)).await;
    }

    /// Make every subsequent send fail with a transport error.
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// All texts passed to `send_text()`.
    pub async fn sent_texts(&self) -> Vec<SentText> {
        self.sent_texts.lock().await.clone()
    }

    /// Count of sent texts.
    pub async fn sent_count(&self) -> usize {
        self.sent_texts.lock().await.len()
    }

    /// All contact cards passed to `send_contact_card()`.
    pub async fn sent_cards(&self) -> Vec<(String, ContactCard)> {
        self.sent_cards.lock().await.clone()
    }

    /// The presence transitions signalled so far.
    pub async fn presence_log(&self) -> Vec<(String, Presence)> {
        self.presence_log.lock().await.clone()
    }

    /// Clear captured sends.
    pub async fn clear_sent(&self) {
        self.sent_texts.lock().await.clear();
        self.sent_cards.lock().await.clear();
        self.presence_log.lock().await.clear();
    }

    fn check_failure(&self) -> Result<(), SokoniError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(SokoniError::Transport {
                message: "mock send failure".into(),
                source: None,
            });
        }
        Ok(())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transport
    }

    async fn health_check(&self) -> Result<HealthStatus, SokoniError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SokoniError> {
        Ok(())
    }
}

#[async_trait]
impl TransportAdapter for MockTransport {
    async fn connect(&mut self) -> Result<(), SokoniError> {
        Ok(())
    }

    async fn send_text(
        &self,
        address: &str,
        body: &str,
    ) -> Result<Option<Receipt>, SokoniError> {
        self.check_failure()?;
        self.sent_texts.lock().await.push(SentText {
            address: address.to_string(),
            body: body.to_string(),
        });
        Ok(Some(Receipt {
            message_id: MessageId(format!("mock-msg-{}", uuid::Uuid::new_v4())),
        }))
    }

    async fn send_image(
        &self,
        _address: &str,
        _url: &str,
        _caption: Option<&str>,
    ) -> Result<(), SokoniError> {
        self.check_failure()
    }

    async fn send_contact_card(
        &self,
        address: &str,
        card: &ContactCard,
    ) -> Result<(), SokoniError> {
        self.check_failure()?;
        self.sent_cards
            .lock()
            .await
            .push((address.to_string(), card.clone()));
        Ok(())
    }

    async fn set_presence(
        &self,
        address: &str,
        presence: Presence,
    ) -> Result<(), SokoniError> {
        self.presence_log
            .lock()
            .await
            .push((address.to_string(), presence));
        Ok(())
    }

    async fn next_event(&self) -> Result<TransportEvent, SokoniError> {
        loop {
            {
                let mut queue = self.events.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            // Wait for notification that a new event was injected
            self.notify.notified().await;
        }
    }
}
