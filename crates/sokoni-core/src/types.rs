// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Sokoni pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for a message as assigned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Transport,
    Storage,
    Responder,
}

/// Direction of a logged message, stored as lowercase text in the database.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// Media attached to an inbound message (image, audio, document).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// URL where the transport exposes the downloaded media.
    pub url: String,
    pub mime_type: Option<String>,
    pub caption: Option<String>,
}

/// An inbound message received from the transport.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub id: String,
    /// Sender's contact address (phone-like string, e.g. `2547...@s.whatsapp.net`).
    pub address: String,
    /// Display name the sender advertises, when the transport provides one.
    pub push_name: Option<String>,
    pub body: String,
    pub media: Option<MediaAttachment>,
    /// RFC 3339 timestamp assigned by the transport.
    pub timestamp: String,
}

/// Typing-presence states the transport can signal to a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Presence {
    /// Peer sees "typing...".
    Composing,
    /// Typing indicator cleared.
    Paused,
}

/// Delivery receipt returned by the transport for a successful send.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub message_id: MessageId,
}

/// Events emitted by the transport's event stream.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// Connection to the messaging platform established.
    Open,
    /// An inbound message arrived.
    Message(InboundMessage),
    /// Connection closed; the transport's supervisor handles reconnection.
    Closed { reason: String },
}

/// Per-shopper messaging state, one row per registered contact address.
///
/// `daily_message_count` is only meaningful when `last_message_date` is
/// today; callers must compare the date before comparing against the cap.
/// `engagement_score` is kept within [0, 100] by the storage layer.
/// `opted_out` is terminal: this subsystem never flips it back.
#[derive(Debug, Clone)]
pub struct Contact {
    pub id: String,
    pub address: String,
    pub display_name: Option<String>,
    pub daily_message_count: i64,
    /// `YYYY-MM-DD` in the bot's configured timezone.
    pub last_message_date: Option<String>,
    pub engagement_score: i64,
    pub opted_out: bool,
    pub contact_reminder_count: i64,
    pub last_contact_reminder_date: Option<String>,
    pub last_interaction_at: Option<String>,
    pub created_at: String,
}

/// One append-only message-log row, created once per inbound or outbound
/// message and never mutated or deleted by this subsystem.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub id: String,
    /// Nullable: inbound messages from an address not yet mapped to a
    /// contact are logged once the contact record is created.
    pub user_id: Option<String>,
    pub direction: Direction,
    pub body: String,
    /// UTC, `%Y-%m-%dT%H:%M:%fZ` (lexicographically sortable).
    pub created_at: String,
    pub response_delay_ms: Option<i64>,
    pub was_throttled: bool,
}

/// A minimal vCard the bot sends so shoppers can save the store's number.
#[derive(Debug, Clone)]
pub struct ContactCard {
    pub display_name: String,
    pub phone: String,
}

impl ContactCard {
    /// Renders the card as a vCard 3.0 payload.
    pub fn vcard(&self) -> String {
        format!(
            "BEGIN:VCARD\nVERSION:3.0\nFN:{}\nTEL;type=CELL;waid={}:+{}\nEND:VCARD",
            self.display_name,
            self.phone.trim_start_matches('+'),
            self.phone.trim_start_matches('+'),
        )
    }
}

/// One prior exchange handed to the responder as conversation context.
#[derive(Debug, Clone)]
pub struct HistoryTurn {
    pub direction: Direction,
    pub body: String,
}

/// A request for the responder to generate a reply.
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    /// Shopper's display name, when known.
    pub contact_name: Option<String>,
    /// Prior exchanges, chronological order.
    pub history: Vec<HistoryTurn>,
    /// The current inbound message body.
    pub body: String,
    pub media: Option<MediaAttachment>,
}

/// A catalog entry surfaced by the `search` and `hot_deals` tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductHit {
    pub name: String,
    pub price: String,
    pub url: Option<String>,
}

/// Storefront identity surfaced by the `store_details` tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDetails {
    pub name: String,
    pub address: String,
    pub opening_hours: String,
    pub phone: String,
}
