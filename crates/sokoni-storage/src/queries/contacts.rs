// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact state operations.
//!
//! Counter mutations are single conditional UPDATE statements so that two
//! concurrent handlers for the same contact cannot under- or over-count;
//! the single-writer connection serializes them.

use rusqlite::params;
use sokoni_core::SokoniError;

use crate::database::Database;
use crate::models::Contact;

const CONTACT_COLUMNS: &str = "id, address, display_name, daily_message_count, \
     last_message_date, engagement_score, opted_out, contact_reminder_count, \
     last_contact_reminder_date, last_interaction_at, created_at";

fn map_contact_row(row: &rusqlite::Row<'_>) -> Result<Contact, rusqlite::Error> {
    Ok(Contact {
        id: row.get(0)?,
        address: row.get(1)?,
        display_name: row.get(2)?,
        daily_message_count: row.get(3)?,
        last_message_date: row.get(4)?,
        engagement_score: row.get(5)?,
        opted_out: row.get::<_, i64>(6)? != 0,
        contact_reminder_count: row.get(7)?,
        last_contact_reminder_date: row.get(8)?,
        last_interaction_at: row.get(9)?,
        created_at: row.get(10)?,
    })
}

/// Insert a new contact.
pub async fn create_contact(db: &Database, contact: &Contact) -> Result<(), SokoniError> {
    let contact = contact.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO contacts (id, address, display_name, daily_message_count,
                     last_message_date, engagement_score, opted_out, contact_reminder_count,
                     last_contact_reminder_date, last_interaction_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    contact.id,
                    contact.address,
                    contact.display_name,
                    contact.daily_message_count,
                    contact.last_message_date,
                    contact.engagement_score,
                    contact.opted_out as i64,
                    contact.contact_reminder_count,
                    contact.last_contact_reminder_date,
                    contact.last_interaction_at,
                    contact.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a contact by ID.
pub async fn get_contact(db: &Database, id: &str) -> Result<Option<Contact>, SokoniError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], map_contact_row);
            match result {
                Ok(contact) => Ok(Some(contact)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Find a contact by its messaging address.
pub async fn find_by_address(
    db: &Database,
    address: &str,
) -> Result<Option<Contact>, SokoniError> {
    let address = address.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONTACT_COLUMNS} FROM contacts WHERE address = ?1"
            ))?;
            let result = stmt.query_row(params![address], map_contact_row);
            match result {
                Ok(contact) => Ok(Some(contact)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Set the terminal opted-out flag.
pub async fn mark_opted_out(db: &Database, id: &str) -> Result<(), SokoniError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE contacts SET opted_out = 1 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record the timestamp of the most recent inbound message.
pub async fn touch_last_interaction(
    db: &Database,
    id: &str,
    at: &str,
) -> Result<(), SokoniError> {
    let id = id.to_string();
    let at = at.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE contacts SET last_interaction_at = ?2 WHERE id = ?1",
                params![id, at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Advance the daily send counter.
///
/// Resets to 1 when `last_message_date` is stale, increments otherwise.
/// One statement, so the date check and the write cannot interleave with
/// another handler's update.
pub async fn record_outbound_sent(
    db: &Database,
    id: &str,
    today: &str,
) -> Result<(), SokoniError> {
    let id = id.to_string();
    let today = today.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE contacts SET
                     daily_message_count = CASE
                         WHEN last_message_date = ?2 THEN daily_message_count + 1
                         ELSE 1
                     END,
                     last_message_date = ?2
                 WHERE id = ?1",
                params![id, today],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Apply a signed engagement delta, clamped to [0, 100] inside the update.
///
/// Returns the new score.
pub async fn adjust_engagement(
    db: &Database,
    id: &str,
    delta: i64,
) -> Result<i64, SokoniError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE contacts SET
                     engagement_score = MAX(0, MIN(100, engagement_score + ?2))
                 WHERE id = ?1",
                params![id, delta],
            )?;
            let score = conn.query_row(
                "SELECT engagement_score FROM contacts WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )?;
            Ok(score)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Bump the contact-reminder counter and date.
pub async fn record_contact_reminder(
    db: &Database,
    id: &str,
    today: &str,
) -> Result<(), SokoniError> {
    let id = id.to_string();
    let today = today.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE contacts SET
                     contact_reminder_count = contact_reminder_count + 1,
                     last_contact_reminder_date = ?2
                 WHERE id = ?1",
                params![id, today],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
