// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport adapter trait for the outbound/inbound messaging capability.

use async_trait::async_trait;

use crate::error::SokoniError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ContactCard, Presence, Receipt, TransportEvent};

/// Adapter for the messaging transport (WhatsApp Web bridge).
///
/// The transport owns its own connection lifecycle: `connect` starts a
/// supervisor that reconnects on unexpected closure, and `next_event`
/// yields the merged stream of lifecycle and message events.
#[async_trait]
pub trait TransportAdapter: PluginAdapter {
    /// Establishes the connection and starts the reconnect supervisor.
    async fn connect(&mut self) -> Result<(), SokoniError>;

    /// Sends a text message to the given address.
    ///
    /// Returns `None` when the platform acknowledged the send without
    /// assigning a message id.
    async fn send_text(&self, address: &str, body: &str)
        -> Result<Option<Receipt>, SokoniError>;

    /// Sends an image by URL with an optional caption.
    async fn send_image(
        &self,
        address: &str,
        url: &str,
        caption: Option<&str>,
    ) -> Result<(), SokoniError>;

    /// Sends a contact card (vCard) to the given address.
    async fn send_contact_card(
        &self,
        address: &str,
        card: &ContactCard,
    ) -> Result<(), SokoniError>;

    /// Sets the typing-presence state shown to the given address.
    async fn set_presence(&self, address: &str, presence: Presence)
        -> Result<(), SokoniError>;

    /// Receives the next event from the transport.
    async fn next_event(&self) -> Result<TransportEvent, SokoniError>;
}
