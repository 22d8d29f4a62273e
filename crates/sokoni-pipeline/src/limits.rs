// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed policy limits for the response pipeline.
//!
//! These are compile-time constants, not configuration: the operating
//! assumption is one storefront account with one sending policy.

/// Automated replies a single contact may receive per local day.
pub const MAX_MESSAGES_PER_DAY: i64 = 20;

/// Outbound sends permitted account-wide per local day. Protects the
/// WhatsApp account from platform abuse flags regardless of per-user budgets.
pub const GLOBAL_DAILY_LIMIT: i64 = 500;

/// Shortest and longest simulated typing delays.
pub const MIN_RESPONSE_DELAY_MS: u64 = 2000;
pub const MAX_RESPONSE_DELAY_MS: u64 = 8000;

/// Nightly no-send window: [start, end) in local hours.
pub const QUIET_START_HOUR: u32 = 2;
pub const QUIET_END_HOUR: u32 = 6;

/// Minimum engagement score that still earns automated replies.
pub const ENGAGEMENT_THRESHOLD: i64 = 30;

/// Score subtracted for an unprompted outbound send.
pub const NON_RESPONSE_PENALTY: i64 = 15;

/// Score added when a contact replies and gets answered.
pub const RESPONSE_REWARD: i64 = 5;

/// Case-insensitive substrings that trigger the permanent opt-out path.
pub const STOP_KEYWORDS: [&str; 5] = ["stop", "unsubscribe", "stop bot", "opt out", "optout"];

/// Lifetime cap and minimum spacing for the save-my-contact nudge.
pub const CONTACT_REMINDER_MAX: i64 = 2;
pub const CONTACT_REMINDER_SPACING_DAYS: i64 = 7;

/// Prior log rows handed to the responder as conversation context.
pub const HISTORY_LIMIT: i64 = 10;
