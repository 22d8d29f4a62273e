// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response gating and orchestration for the Sokoni assistant.
//!
//! Decides, for every inbound WhatsApp message, whether it earns an
//! automated reply: per-contact daily rate window, account-wide daily
//! ceiling, nightly quiet hours, and a bounded engagement score, with a
//! terminal stop-keyword opt-out ahead of everything else. The
//! [`pipeline::ResponsePipeline`] sequences the gates;
//! [`runner::PipelineRunner`] feeds it from the transport's event stream.

pub mod breaker;
pub mod delay;
pub mod engagement;
pub mod keywords;
pub mod limits;
pub mod pipeline;
pub mod quiet_hours;
pub mod rate_window;
pub mod reminder;
pub mod runner;

pub use breaker::GlobalCircuitBreaker;
pub use pipeline::{ResponsePipeline, FALLBACK_REPLY, OPT_OUT_CONFIRMATION};
pub use rate_window::RateDecision;
pub use runner::PipelineRunner;
