// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock responder adapter for deterministic testing.
//!
//! `MockResponder` implements `ResponderAdapter` with pre-configured
//! replies and one-shot failure injection, enabling fast, CI-runnable
//! tests without external API calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use sokoni_core::types::{AdapterType, HealthStatus, ReplyRequest};
use sokoni_core::{PluginAdapter, ResponderAdapter, SokoniError};

/// A mock reply backend that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, a
/// default "mock reply" text is returned.
pub struct MockResponder {
    replies: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<ReplyRequest>>>,
    fail_next: AtomicBool,
}

impl MockResponder {
    /// Create a new mock responder with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Create a mock responder pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            requests: Arc::new(Mutex::new(Vec::new())),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn add_reply(&self, text: String) {
        self.replies.lock().await.push_back(text);
    }

    /// Make the next `generate()` call fail, then recover.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Every request seen so far.
    pub async fn requests(&self) -> Vec<ReplyRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_reply(&self) -> String {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock reply".to_string())
    }
}

impl Default for MockResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockResponder {
    fn name(&self) -> &str {
        "mock-responder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Responder
    }

    async fn health_check(&self) -> Result<HealthStatus, SokoniError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SokoniError> {
        Ok(())
    }
}

#[async_trait]
impl ResponderAdapter for MockResponder {
    async fn generate(&self, request: ReplyRequest) -> Result<String, SokoniError> {
        self.requests.lock().await.push(request);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SokoniError::Responder {
                message: "mock generation failure".into(),
                source: None,
            });
        }
        Ok(self.next_reply().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_request(body: &str) -> ReplyRequest {
        ReplyRequest {
            contact_name: None,
            history: Vec::new(),
            body: body.to_string(),
            media: None,
        }
    }

    #[tokio::test]
    async fn default_reply_when_queue_empty() {
        let responder = MockResponder::new();
        let reply = responder.generate(make_request("hi")).await.unwrap();
        assert_eq!(reply, "mock reply");
    }

    #[tokio::test]
    async fn queued_replies_returned_in_order() {
        let responder = MockResponder::with_replies(vec![
            "first".to_string(),
            "second".to_string(),
        ]);
        assert_eq!(responder.generate(make_request("a")).await.unwrap(), "first");
        assert_eq!(responder.generate(make_request("b")).await.unwrap(), "second");
        // Queue exhausted, falls back to default
        assert_eq!(
            responder.generate(make_request("c")).await.unwrap(),
            "mock reply"
        );
    }

    #[tokio::test]
    async fn fail_next_fails_once_then_recovers() {
        let responder = MockResponder::with_replies(vec!["ok".to_string()]);
        responder.fail_next();
        assert!(responder.generate(make_request("a")).await.is_err());
        assert_eq!(responder.generate(make_request("b")).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn requests_are_recorded() {
        let responder = MockResponder::new();
        responder.generate(make_request("question one")).await.unwrap();
        responder.generate(make_request("question two")).await.unwrap();

        let requests = responder.requests().await;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].body, "question one");
        assert_eq!(requests[1].body, "question two");
    }
}
