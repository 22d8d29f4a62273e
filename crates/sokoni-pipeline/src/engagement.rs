// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engagement scoring rules.
//!
//! The score is a bounded [0, 100] reputation per contact: replies earn it
//! back, unprompted sends burn it down. Contacts below the threshold stop
//! receiving automated replies, which keeps cold numbers from accumulating
//! spam complaints. The storage layer applies the same clamp inside its
//! UPDATE; the pure rule here exists for gate checks and property tests.

use crate::limits::{ENGAGEMENT_THRESHOLD, NON_RESPONSE_PENALTY, RESPONSE_REWARD};

/// Why a score is being adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// The contact replied and was answered.
    Reply,
    /// The bot messaged the contact without a prior qualifying trigger.
    UnpromptedSend,
}

/// Signed score delta for an adjustment.
pub fn delta(adjustment: Adjustment) -> i64 {
    match adjustment {
        Adjustment::Reply => RESPONSE_REWARD,
        Adjustment::UnpromptedSend => -NON_RESPONSE_PENALTY,
    }
}

/// Applies an adjustment to a score, clamped to [0, 100].
pub fn apply(score: i64, adjustment: Adjustment) -> i64 {
    (score + delta(adjustment)).clamp(0, 100)
}

/// Whether the contact is still worth messaging.
pub fn is_engaged(score: i64) -> bool {
    score >= ENGAGEMENT_THRESHOLD
}
