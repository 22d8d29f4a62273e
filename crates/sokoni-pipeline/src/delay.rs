// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Simulated typing delay.
//!
//! Longer replies get a longer randomized delay so responses don't land
//! instantaneously. The delay is "spent" by the pipeline holding a typing
//! presence signal while it sleeps.

use std::time::Duration;

use rand::Rng;

/// Delay bounds in milliseconds for a reply of the given length.
pub fn delay_bounds(reply_len: usize) -> (u64, u64) {
    if reply_len > 100 {
        (5000, 8000)
    } else if reply_len > 50 {
        (3000, 5000)
    } else {
        (2000, 4000)
    }
}

/// Picks a randomized delay within the tier for the reply length.
pub fn response_delay(reply_len: usize) -> Duration {
    let (lo, hi) = delay_bounds(reply_len);
    Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::{MAX_RESPONSE_DELAY_MS, MIN_RESPONSE_DELAY_MS};

    #[test]
    fn tiers_by_length() {
        assert_eq!(delay_bounds(10), (2000, 4000));
        assert_eq!(delay_bounds(50), (2000, 4000));
        assert_eq!(delay_bounds(51), (3000, 5000));
        assert_eq!(delay_bounds(100), (3000, 5000));
        assert_eq!(delay_bounds(101), (5000, 8000));
        assert_eq!(delay_bounds(2000), (5000, 8000));
    }

    #[test]
    fn sampled_delays_stay_within_global_bounds() {
        for len in [0, 30, 80, 500] {
            for _ in 0..50 {
                let ms = response_delay(len).as_millis() as u64;
                assert!(ms >= MIN_RESPONSE_DELAY_MS, "delay {ms} below floor");
                assert!(ms <= MAX_RESPONSE_DELAY_MS, "delay {ms} above ceiling");
            }
        }
    }

    #[test]
    fn sampled_delay_respects_its_tier() {
        for _ in 0..50 {
            let ms = response_delay(200).as_millis() as u64;
            assert!((5000..=8000).contains(&ms));
        }
    }
}
