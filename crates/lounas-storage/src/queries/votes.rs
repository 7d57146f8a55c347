// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vote rows.
//!
//! `(ts, channel, user_id, action)` is unique, so a repeated vote is
//! silently dropped even when two clicks race each other.

use chrono::Utc;
use lounas_core::{LounasError, MessageEntry, VoteRecord};
use rusqlite::params;

use crate::database::Database;
use crate::queries::messages::{self, StoredMessage};

/// Outcome of [`add_vote`] on the database thread.
enum AddVote {
    NoMessage,
    Stored(StoredMessage),
}

/// Append a vote to a recorded message and return the updated entry.
///
/// Fails if the message was never recorded.
pub async fn add_vote(
    db: &Database,
    ts: &str,
    channel: &str,
    vote: &VoteRecord,
) -> Result<MessageEntry, LounasError> {
    let ts = ts.to_string();
    let channel = channel.to_string();
    let vote = vote.clone();

    let outcome = db
        .connection()
        .call(move |conn| -> Result<AddVote, rusqlite::Error> {
            let tx = conn.transaction()?;
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM lounas_messages WHERE ts = ?1 AND channel = ?2)",
                params![ts, channel],
                |row| row.get(0),
            )?;
            if !exists {
                return Ok(AddVote::NoMessage);
            }
            insert_vote_tx(&tx, &ts, &channel, &vote.user_id, &vote.action)?;
            let stored = messages::load_message(&tx, &ts, &channel)?;
            tx.commit()?;
            Ok(stored.map_or(AddVote::NoMessage, AddVote::Stored))
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    match outcome {
        AddVote::Stored(stored) => stored.into_entry(),
        AddVote::NoMessage => Err(LounasError::storage("message has not been recorded")),
    }
}

pub(crate) fn insert_vote_tx(
    conn: &rusqlite::Connection,
    ts: &str,
    channel: &str,
    user_id: &str,
    action: &str,
) -> Result<usize, rusqlite::Error> {
    conn.execute(
        "INSERT OR IGNORE INTO votes (ts, channel, user_id, action, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![ts, channel, user_id, action, Utc::now().to_rfc3339()],
    )
}

pub(crate) fn votes_for_message(
    conn: &rusqlite::Connection,
    ts: &str,
    channel: &str,
) -> Result<Vec<VoteRecord>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT user_id, action FROM votes WHERE ts = ?1 AND channel = ?2 ORDER BY id ASC",
    )?;
    let rows = stmt.query_map(params![ts, channel], |row| {
        Ok(VoteRecord {
            user_id: row.get(0)?,
            action: row.get(1)?,
        })
    })?;
    rows.collect()
}
