// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for posted menu messages and their votes.
//!
//! Embedded migrations run on open and every query is serialized through
//! `tokio-rusqlite`'s background thread.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteVoteStore;
pub use database::Database;
