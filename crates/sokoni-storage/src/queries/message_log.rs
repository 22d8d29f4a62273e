// SPDX-FileCopyrightText: 2026 Sokoni Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only message log operations.

use std::str::FromStr;

use rusqlite::params;
use sokoni_core::SokoniError;

use crate::database::Database;
use crate::models::{Direction, LogEntry};

fn map_log_row(row: &rusqlite::Row<'_>) -> Result<LogEntry, rusqlite::Error> {
    let direction_text: String = row.get(2)?;
    let direction = Direction::from_str(&direction_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(LogEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        direction,
        body: row.get(3)?,
        created_at: row.get(4)?,
        response_delay_ms: row.get(5)?,
        was_throttled: row.get::<_, i64>(6)? != 0,
    })
}

/// Append one immutable log row.
pub async fn append_log(db: &Database, entry: &LogEntry) -> Result<(), SokoniError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO message_log (id, user_id, direction, body, created_at,
                     response_delay_ms, was_throttled)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    entry.id,
                    entry.user_id,
                    entry.direction.to_string(),
                    entry.body,
                    entry.created_at,
                    entry.response_delay_ms,
                    entry.was_throttled as i64,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a contact's most recent `limit` rows in chronological order.
pub async fn recent_for_contact(
    db: &Database,
    user_id: &str,
    limit: i64,
) -> Result<Vec<LogEntry>, SokoniError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, direction, body, created_at,
                        response_delay_ms, was_throttled
                 FROM message_log WHERE user_id = ?1
                 ORDER BY created_at DESC LIMIT ?2",
            )?;
            let rows = stmt.query_map(params![user_id, limit], map_log_row)?;
            let mut entries = Vec::new();
            for row in rows {
                entries.push(row?);
            }
            // Fetched newest-first for the LIMIT; callers want oldest-first.
            entries.reverse();
            Ok(entries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Count outbound rows with `created_at >= since` (UTC timestamp string).
pub async fn count_outbound_since(db: &Database, since: &str) -> Result<i64, SokoniError> {
    let since = since.to_string();
    db.connection()
        .call(move |conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM message_log
                 WHERE direction = 'outbound' AND created_at >= ?1",
                params![since],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
