// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event loop driving the pipeline from the transport's event stream.
//!
//! Each inbound message is handled in an independent spawned task: two
//! messages for different contacts (or even the same contact in quick
//! succession) run concurrently with no per-contact serialization. The
//! storage layer's atomic counter updates keep the shared state correct.

use std::sync::Arc;

use sokoni_core::types::TransportEvent;
use sokoni_core::{SokoniError, StorageAdapter, TransportAdapter};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::pipeline::ResponsePipeline;

/// Runs the pipeline against the transport until cancelled.
pub struct PipelineRunner {
    transport: Arc<dyn TransportAdapter + Send + Sync>,
    storage: Arc<dyn StorageAdapter + Send + Sync>,
    pipeline: Arc<ResponsePipeline>,
}

impl PipelineRunner {
    pub fn new(
        transport: Arc<dyn TransportAdapter + Send + Sync>,
        storage: Arc<dyn StorageAdapter + Send + Sync>,
        pipeline: Arc<ResponsePipeline>,
    ) -> Self {
        Self {
            transport,
            storage,
            pipeline,
        }
    }

    /// Runs the event loop until the cancellation token is triggered.
    ///
    /// The loop:
    /// 1. Waits for transport events
    /// 2. Spawns an independent handler task per inbound message
    /// 3. Logs connection lifecycle events (reconnection is the transport
    ///    supervisor's job)
    /// 4. On cancellation, closes storage and exits
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), SokoniError> {
        info!("pipeline runner started");

        loop {
            tokio::select! {
                event = self.transport.next_event() => {
                    match event {
                        Ok(TransportEvent::Message(msg)) => {
                            let pipeline = self.pipeline.clone();
                            tokio::spawn(async move {
                                if let Err(e) = pipeline.handle_inbound(msg).await {
                                    error!(error = %e, "failed to handle inbound message");
                                }
                            });
                        }
                        Ok(TransportEvent::Open) => {
                            info!("transport connection established");
                        }
                        Ok(TransportEvent::Closed { reason }) => {
                            warn!(
                                reason = reason.as_str(),
                                "transport connection closed, supervisor reconnecting"
                            );
                        }
                        Err(e) => {
                            error!(error = %e, "transport event error");
                            // A permanently closed event stream ends the loop.
                            if e.to_string().contains("closed") {
                                break;
                            }
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping pipeline runner");
                    break;
                }
            }
        }

        self.storage.close().await?;
        info!("pipeline runner stopped");
        Ok(())
    }
}
