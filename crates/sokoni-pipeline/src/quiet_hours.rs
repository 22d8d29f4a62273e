// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nightly quiet-hours gate.
//!
//! Pure function of local wall-clock time; no state. Messages arriving in
//! the window are dropped from automated response, never queued for later.

use crate::limits::{QUIET_END_HOUR, QUIET_START_HOUR};

/// True when `hour` falls within the configured quiet window [start, end).
pub fn is_quiet(hour: u32) -> bool {
    (QUIET_START_HOUR..QUIET_END_HOUR).contains(&hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_boundaries() {
        assert!(is_quiet(2));
        assert!(is_quiet(5));
        assert!(!is_quiet(6));
        assert!(!is_quiet(1));
    }

    #[test]
    fn daytime_hours_are_not_quiet() {
        for hour in [0, 7, 12, 18, 23] {
            assert!(!is_quiet(hour), "hour {hour} should not be quiet");
        }
    }
}
