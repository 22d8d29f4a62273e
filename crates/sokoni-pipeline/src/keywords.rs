// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stop-keyword detection for the compliance opt-out path.

use crate::limits::STOP_KEYWORDS;

/// True when the message body contains any stop keyword, case-insensitive.
pub fn is_stop_request(body: &str) -> bool {
    let lowered = body.to_lowercase();
    STOP_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}
