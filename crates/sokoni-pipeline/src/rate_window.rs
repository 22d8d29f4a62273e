// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-contact daily rate window.
//!
//! The counter "resets" by date comparison rather than a scheduled job:
//! a stale `last_message_date` means the stored count is ignored. The
//! advance side lives in `StorageAdapter::record_outbound_sent`, which is
//! called only after a successful send and applies the same date logic
//! atomically in SQL.

use chrono::NaiveDate;
use sokoni_core::types::Contact;

use crate::limits::MAX_MESSAGES_PER_DAY;

/// Outcome of a rate-window check.
#[derive(Debug, Clone)]
pub struct RateDecision {
    pub allowed: bool,
    /// Sends left today, after this one would be counted.
    pub remaining: i64,
    /// User-facing notice; set only when refused.
    pub notice: Option<String>,
}

/// Checks whether the contact may receive another automated reply today.
pub fn check(contact: &Contact, today: NaiveDate) -> RateDecision {
    let today_str = today.format("%Y-%m-%d").to_string();
    let effective_count = match &contact.last_message_date {
        Some(date) if *date == today_str => contact.daily_message_count,
        _ => 0,
    };

    if effective_count >= MAX_MESSAGES_PER_DAY {
        return RateDecision {
            allowed: false,
            remaining: 0,
            notice: Some(format!(
                "You've reached today's limit of {MAX_MESSAGES_PER_DAY} assistant replies. \
                 Please message us again tomorrow."
            )),
        };
    }

    RateDecision {
        allowed: true,
        remaining: MAX_MESSAGES_PER_DAY - effective_count,
        notice: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact_with(count: i64, last_date: Option<&str>) -> Contact {
        Contact {
            id: "c1".to_string(),
            address: "a1".to_string(),
            display_name: None,
            daily_message_count: count,
            last_message_date: last_date.map(String::from),
            engagement_score: 100,
            opted_out: false,
            contact_reminder_count: 0,
            last_contact_reminder_date: None,
            last_interaction_at: None,
            created_at: "2026-01-02T00:00:00.000Z".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()
    }

    #[test]
    fn fresh_contact_gets_full_budget() {
        let decision = check(&contact_with(0, None), today());
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 20);
        assert!(decision.notice.is_none());
    }

    #[test]
    fn stale_date_resets_the_count() {
        // Yesterday's 20 sends do not count against today.
        let decision = check(&contact_with(20, Some("2026-01-01")), today());
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 20);
    }

    #[test]
    fn boundary_at_nineteen_and_twenty() {
        let decision = check(&contact_with(19, Some("2026-01-02")), today());
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 1);

        let decision = check(&contact_with(20, Some("2026-01-02")), today());
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        let notice = decision.notice.expect("refusal carries a notice");
        assert!(notice.contains("tomorrow"));
    }

    #[test]
    fn over_cap_is_still_refused() {
        let decision = check(&contact_with(35, Some("2026-01-02")), today());
        assert!(!decision.allowed);
    }
}
