// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp transport adapter for the Sokoni assistant.
//!
//! Implements [`TransportAdapter`] against a WhatsApp Web bridge sidecar:
//! inbound events arrive over the bridge's WebSocket stream, outbound
//! sends go through its HTTP API. Connection lifecycle is owned by the
//! [`supervisor`] task, which reconnects with a fixed delay on closure.

pub mod client;
pub mod supervisor;
pub mod wire;

use async_trait::async_trait;
use sokoni_config::model::WhatsappConfig;
use sokoni_core::types::{
    AdapterType, ContactCard, HealthStatus, MessageId, Presence, Receipt, TransportEvent,
};
use sokoni_core::{PluginAdapter, SokoniError, TransportAdapter};
use tokio::sync::mpsc;
use tracing::debug;

use crate::client::BridgeClient;

/// WhatsApp bridge transport implementing [`TransportAdapter`].
pub struct WhatsappBridge {
    ws_url: String,
    client: BridgeClient,
    events_rx: tokio::sync::Mutex<mpsc::Receiver<TransportEvent>>,
    events_tx: mpsc::Sender<TransportEvent>,
    supervisor_handle: Option<tokio::task::JoinHandle<()>>,
}

impl WhatsappBridge {
    /// Creates a new bridge transport.
    ///
    /// Requires both `whatsapp.bridge_ws_url` and `whatsapp.bridge_api_url`.
    pub fn new(config: WhatsappConfig) -> Result<Self, SokoniError> {
        let ws_url = config.bridge_ws_url.clone().ok_or_else(|| {
            SokoniError::Config("whatsapp.bridge_ws_url is required for the bridge transport".into())
        })?;
        let api_url = config.bridge_api_url.clone().ok_or_else(|| {
            SokoniError::Config("whatsapp.bridge_api_url is required for the bridge transport".into())
        })?;

        let client = BridgeClient::new(api_url, config.api_token.as_deref())?;
        let (events_tx, events_rx) = mpsc::channel(100);

        Ok(Self {
            ws_url,
            client,
            events_rx: tokio::sync::Mutex::new(events_rx),
            events_tx,
            supervisor_handle: None,
        })
    }
}

#[async_trait]
impl PluginAdapter for WhatsappBridge {
    fn name(&self) -> &str {
        "whatsapp-bridge"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Transport
    }

    async fn health_check(&self) -> Result<HealthStatus, SokoniError> {
        match self.client.health().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("bridge unreachable: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), SokoniError> {
        debug!("whatsapp bridge shutting down");
        // The supervisor exits once the event receiver is dropped with the
        // adapter; the runner stops calling next_event() first.
        Ok(())
    }
}

#[async_trait]
impl TransportAdapter for WhatsappBridge {
    async fn connect(&mut self) -> Result<(), SokoniError> {
        if self.supervisor_handle.is_some() {
            return Ok(()); // Already connected
        }
        let handle = supervisor::spawn(self.ws_url.clone(), self.events_tx.clone());
        self.supervisor_handle = Some(handle);
        Ok(())
    }

    async fn send_text(
        &self,
        address: &str,
        body: &str,
    ) -> Result<Option<Receipt>, SokoniError> {
        let response = self.client.send_text(address, body).await?;
        Ok(response.message_id.map(|id| Receipt {
            message_id: MessageId(id),
        }))
    }

    async fn send_image(
        &self,
        address: &str,
        url: &str,
        caption: Option<&str>,
    ) -> Result<(), SokoniError> {
        self.client.send_image(address, url, caption).await?;
        Ok(())
    }

    async fn send_contact_card(
        &self,
        address: &str,
        card: &ContactCard,
    ) -> Result<(), SokoniError> {
        self.client
            .send_contact(address, &card.display_name, card.vcard())
            .await?;
        Ok(())
    }

    async fn set_presence(
        &self,
        address: &str,
        presence: Presence,
    ) -> Result<(), SokoniError> {
        self.client
            .set_presence(address, presence.to_string())
            .await
    }

    async fn next_event(&self) -> Result<TransportEvent, SokoniError> {
        let mut rx = self.events_rx.lock().await;
        rx.recv().await.ok_or_else(|| SokoniError::Transport {
            message: "bridge event stream closed".into(),
            source: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(ws: Option<&str>, api: Option<&str>) -> WhatsappConfig {
        WhatsappConfig {
            bridge_ws_url: ws.map(String::from),
            bridge_api_url: api.map(String::from),
            api_token: Some("token".to_string()),
        }
    }

    #[test]
    fn new_requires_both_urls() {
        assert!(WhatsappBridge::new(config(None, Some("http://127.0.0.1:3000"))).is_err());
        assert!(WhatsappBridge::new(config(Some("ws://127.0.0.1:3000/events"), None)).is_err());
        assert!(WhatsappBridge::new(config(
            Some("ws://127.0.0.1:3000/events"),
            Some("http://127.0.0.1:3000"),
        ))
        .is_ok());
    }

    #[test]
    fn plugin_adapter_metadata() {
        let bridge = WhatsappBridge::new(config(
            Some("ws://127.0.0.1:3000/events"),
            Some("http://127.0.0.1:3000"),
        ))
        .unwrap();
        assert_eq!(bridge.name(), "whatsapp-bridge");
        assert_eq!(bridge.adapter_type(), AdapterType::Transport);
        assert_eq!(bridge.version(), semver::Version::new(0, 1, 0));
    }

    #[tokio::test]
    async fn send_paths_hit_bridge_endpoints() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        for endpoint in ["/send/text", "/send/contact", "/presence"] {
            Mock::given(method("POST"))
                .and(path(endpoint))
                .respond_with(
                    ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
                )
                .mount(&server)
                .await;
        }

        let bridge = WhatsappBridge::new(config(
            Some("ws://127.0.0.1:3000/events"),
            Some(&server.uri()),
        ))
        .unwrap();

        let receipt = bridge
            .send_text("254700000001@s.whatsapp.net", "karibu!")
            .await
            .unwrap();
        assert!(receipt.is_none(), "bridge sent no message_id");

        let card = ContactCard {
            display_name: "Sokoni Store".to_string(),
            phone: "+254700000009".to_string(),
        };
        bridge
            .send_contact_card("254700000001@s.whatsapp.net", &card)
            .await
            .unwrap();

        bridge
            .set_presence("254700000001@s.whatsapp.net", Presence::Composing)
            .await
            .unwrap();
    }
}
