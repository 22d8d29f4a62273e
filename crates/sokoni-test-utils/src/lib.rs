// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Sokoni workspace.
//!
//! Mock adapters and a full-stack test harness for fast, deterministic
//! pipeline tests without a real bridge or completion backend.

pub mod harness;
pub mod mock_responder;
pub mod mock_transport;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_responder::MockResponder;
pub use mock_transport::{MockTransport, SentText};
