// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Save-my-contact nudge policy.
//!
//! Runs as a side effect of the response flow: at most twice per contact,
//! ever, spaced at least seven days apart. The nudge does not advance the
//! per-contact rate window.

use chrono::NaiveDate;
use sokoni_core::types::Contact;

use crate::limits::{CONTACT_REMINDER_MAX, CONTACT_REMINDER_SPACING_DAYS};

/// Whether the contact is due a save-my-contact nudge today.
pub fn should_send(contact: &Contact, today: NaiveDate) -> bool {
    if contact.contact_reminder_count >= CONTACT_REMINDER_MAX {
        return false;
    }
    match &contact.last_contact_reminder_date {
        None => true,
        Some(date) => match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(last) => (today - last).num_days() >= CONTACT_REMINDER_SPACING_DAYS,
            // Unparseable stored date: treat as never sent.
            Err(_) => true,
        },
    }
}
