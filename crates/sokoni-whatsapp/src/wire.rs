// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON wire types for the WhatsApp Web bridge.
//!
//! Bridge -> Sokoni (WebSocket, one JSON object per text frame):
//! ```json
//! {"type": "connected"}
//! {"type": "message", "id": "...", "from": "2547...@s.whatsapp.net",
//!  "push_name": "Asha", "body": "hello", "media": null, "timestamp": "..."}
//! {"type": "disconnected", "reason": "stream errored"}
//! ```
//!
//! Sokoni -> Bridge (HTTP POST bodies) are the `Send*Request` structs.

use serde::{Deserialize, Serialize};

use sokoni_core::clock::format_utc;
use sokoni_core::types::{InboundMessage, MediaAttachment};

/// One event frame from the bridge's WebSocket stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeEvent {
    Connected,
    Message(BridgeMessage),
    Disconnected {
        #[serde(default)]
        reason: Option<String>,
    },
}

/// An inbound message as framed by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeMessage {
    pub id: String,
    pub from: String,
    #[serde(default)]
    pub push_name: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub media: Option<BridgeMedia>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Media metadata as framed by the bridge.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeMedia {
    pub url: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

impl BridgeMessage {
    /// Converts into the channel-agnostic inbound type, stamping receipt
    /// time when the bridge omitted a timestamp.
    pub fn into_inbound(self) -> InboundMessage {
        InboundMessage {
            id: self.id,
            address: self.from,
            push_name: self.push_name,
            body: self.body,
            media: self.media.map(|m| MediaAttachment {
                url: m.url,
                mime_type: m.mime_type,
                caption: m.caption,
            }),
            timestamp: self
                .timestamp
                .unwrap_or_else(|| format_utc(chrono::Utc::now())),
        }
    }
}

/// POST /send/text
#[derive(Debug, Serialize)]
pub struct SendTextRequest<'a> {
    pub to: &'a str,
    pub body: &'a str,
}

/// POST /send/image
#[derive(Debug, Serialize)]
pub struct SendImageRequest<'a> {
    pub to: &'a str,
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<&'a str>,
}

/// POST /send/contact
#[derive(Debug, Serialize)]
pub struct SendContactRequest<'a> {
    pub to: &'a str,
    pub display_name: &'a str,
    pub vcard: String,
}

/// POST /presence
#[derive(Debug, Serialize)]
pub struct PresenceRequest<'a> {
    pub to: &'a str,
    pub state: String,
}

/// Bridge response to a send request.
#[derive(Debug, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub message_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_event_deserializes() {
        let json = r#"{
            "type": "message",
            "id": "ABCD",
            "from": "254700000001@s.whatsapp.net",
            "push_name": "Asha",
            "body": "how much is the lantern?",
            "timestamp": "2026-01-02T09:00:00.000Z"
        }"#;
        let event: BridgeEvent = serde_json::from_str(json).unwrap();
        match event {
            BridgeEvent::Message(msg) => {
                assert_eq!(msg.id, "ABCD");
                assert_eq!(msg.push_name.as_deref(), Some("Asha"));
                let inbound = msg.into_inbound();
                assert_eq!(inbound.address, "254700000001@s.whatsapp.net");
                assert_eq!(inbound.timestamp, "2026-01-02T09:00:00.000Z");
            }
            other => panic!("expected message event, got {other:?}"),
        }
    }

    #[test]
    fn message_with_media_deserializes() {
        let json = r#"{
            "type": "message",
            "id": "EFGH",
            "from": "254700000002@s.whatsapp.net",
            "body": "",
            "media": {"url": "http://bridge/media/1", "mime_type": "image/jpeg"}
        }"#;
        let event: BridgeEvent = serde_json::from_str(json).unwrap();
        let BridgeEvent::Message(msg) = event else {
            panic!("expected message event");
        };
        let inbound = msg.into_inbound();
        let media = inbound.media.expect("media attachment");
        assert_eq!(media.url, "http://bridge/media/1");
        assert_eq!(media.mime_type.as_deref(), Some("image/jpeg"));
        // No bridge timestamp: a receipt-time stamp is substituted.
        assert!(inbound.timestamp.ends_with('Z'));
    }

    #[test]
    fn lifecycle_events_deserialize() {
        let connected: BridgeEvent = serde_json::from_str(r#"{"type":"connected"}"#).unwrap();
        assert!(matches!(connected, BridgeEvent::Connected));

        let disconnected: BridgeEvent =
            serde_json::from_str(r#"{"type":"disconnected","reason":"stream errored"}"#)
                .unwrap();
        match disconnected {
            BridgeEvent::Disconnected { reason } => {
                assert_eq!(reason.as_deref(), Some("stream errored"));
            }
            other => panic!("expected disconnected, got {other:?}"),
        }
    }

    #[test]
    fn send_image_skips_missing_caption() {
        let req = SendImageRequest {
            to: "254700000001@s.whatsapp.net",
            url: "http://cdn/shoe.jpg",
            caption: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("caption"));
    }
}
