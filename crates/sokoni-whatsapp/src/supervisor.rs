// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection supervisor owning the bridge WebSocket and its reconnect loop.
//!
//! The supervisor is an injected object, not module-level state: it holds
//! the socket, forwards decoded events into an mpsc queue, and on any
//! closure sleeps a fixed three seconds before reconnecting. No exponential
//! backoff. The loop ends only when the event receiver is dropped.

use std::time::Duration;

use futures::StreamExt;
use sokoni_core::types::TransportEvent;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tracing::{debug, info, warn};

use crate::wire::BridgeEvent;

/// Fixed delay between reconnect attempts.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Spawns the supervisor task for the given bridge WebSocket URL.
///
/// Decoded events flow into `events_tx`; the task exits when the receiving
/// side is dropped.
pub fn spawn(ws_url: String, events_tx: mpsc::Sender<TransportEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match connect_async(&ws_url).await {
                Ok((socket, _response)) => {
                    info!(url = ws_url.as_str(), "bridge socket connected");
                    if events_tx.send(TransportEvent::Open).await.is_err() {
                        return;
                    }

                    let reason = read_until_closed(socket, &events_tx).await;
                    if events_tx
                        .send(TransportEvent::Closed {
                            reason: reason.clone(),
                        })
                        .await
                        .is_err()
                    {
                        return;
                    }
                    warn!(reason = reason.as_str(), "bridge socket closed");
                }
                Err(e) => {
                    warn!(error = %e, "bridge connect failed");
                }
            }

            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    })
}

/// Reads frames until the socket closes; returns the closure reason.
async fn read_until_closed(
    socket: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    events_tx: &mpsc::Sender<TransportEvent>,
) -> String {
    let (_write, mut read) = socket.split();

    while let Some(frame) = read.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => {
                let event: BridgeEvent = match serde_json::from_str(text.as_str()) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(error = %e, "invalid bridge event frame");
                        continue;
                    }
                };
                match event {
                    BridgeEvent::Message(msg) => {
                        if events_tx
                            .send(TransportEvent::Message(msg.into_inbound()))
                            .await
                            .is_err()
                        {
                            return "event queue dropped".to_string();
                        }
                    }
                    // Open is signalled from the socket handshake; the
                    // bridge's own connected frame is informational.
                    BridgeEvent::Connected => {
                        debug!("bridge reported connected");
                    }
                    BridgeEvent::Disconnected { reason } => {
                        return reason.unwrap_or_else(|| "bridge disconnected".to_string());
                    }
                }
            }
            Ok(WsMessage::Close(_)) => return "socket closed".to_string(),
            Ok(_) => {} // Binary, ping/pong handled by tungstenite.
            Err(e) => return format!("socket error: {e}"),
        }
    }

    "stream ended".to_string()
}
