// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Posted message rows.

use chrono::{DateTime, Utc};
use lounas_core::types::MenuSnapshot;
use lounas_core::{LounasError, MessageEntry};
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::queries::votes;

/// Insert a posted message. Recording the same `(ts, channel)` twice is a no-op.
pub async fn insert_message(db: &Database, entry: &MessageEntry) -> Result<(), LounasError> {
    let menu = serde_json::to_string(&entry.menu).map_err(|e| LounasError::Storage {
        source: Box::new(e),
    })?;
    let ts = entry.ts.clone();
    let channel = entry.channel.clone();
    let created_at = entry.date.to_rfc3339();
    let initial_votes = entry.votes.clone();

    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT OR IGNORE INTO lounas_messages (ts, channel, menu, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![ts, channel, menu, created_at],
            )?;
            for vote in &initial_votes {
                votes::insert_vote_tx(&tx, &ts, &channel, &vote.user_id, &vote.action)?;
            }
            tx.commit()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Load a message with all of its votes in the order they were cast.
pub async fn get_message(
    db: &Database,
    ts: &str,
    channel: &str,
) -> Result<Option<MessageEntry>, LounasError> {
    let ts = ts.to_string();
    let channel = channel.to_string();

    let row = db
        .connection()
        .call(move |conn| -> Result<Option<StoredMessage>, rusqlite::Error> {
            load_message(conn, &ts, &channel)
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    row.map(StoredMessage::into_entry).transpose()
}

/// Raw row data, decoded into a [`MessageEntry`] outside the database thread.
pub(crate) struct StoredMessage {
    ts: String,
    channel: String,
    menu: String,
    created_at: String,
    votes: Vec<lounas_core::VoteRecord>,
}

impl StoredMessage {
    pub(crate) fn into_entry(self) -> Result<MessageEntry, LounasError> {
        let menu: Vec<MenuSnapshot> =
            serde_json::from_str(&self.menu).map_err(|e| LounasError::Storage {
                source: Box::new(e),
            })?;
        let date = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| LounasError::Storage {
                source: Box::new(e),
            })?;
        Ok(MessageEntry {
            ts: self.ts,
            channel: self.channel,
            menu,
            date,
            votes: self.votes,
        })
    }
}

pub(crate) fn load_message(
    conn: &rusqlite::Connection,
    ts: &str,
    channel: &str,
) -> Result<Option<StoredMessage>, rusqlite::Error> {
    let head = conn
        .query_row(
            "SELECT menu, created_at FROM lounas_messages WHERE ts = ?1 AND channel = ?2",
            params![ts, channel],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;

    let Some((menu, created_at)) = head else {
        return Ok(None);
    };

    Ok(Some(StoredMessage {
        ts: ts.to_string(),
        channel: channel.to_string(),
        menu,
        created_at,
        votes: votes::votes_for_message(conn, ts, channel)?,
    }))
}
