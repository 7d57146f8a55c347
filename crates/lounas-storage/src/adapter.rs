// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the VoteStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use lounas_config::model::StorageConfig;
use lounas_core::{
    AdapterType, HealthStatus, LounasError, MessageEntry, PluginAdapter, VoteRecord, VoteStore,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed vote store.
///
/// The database is opened by [`SqliteVoteStore::initialize`]; every trait
/// method fails with a storage error until then.
pub struct SqliteVoteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteVoteStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database and run migrations.
    pub async fn initialize(&self) -> Result<(), LounasError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| LounasError::storage("vote store already initialized"))?;
        debug!(path = %self.config.database_path, "vote store initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, LounasError> {
        self.db
            .get()
            .ok_or_else(|| LounasError::storage("vote store not initialized"))
    }
}

#[async_trait]
impl PluginAdapter for SqliteVoteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, LounasError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("not initialized".to_string()));
        };
        let ping = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> { conn.execute_batch("SELECT 1;") })
            .await;
        Ok(match ping {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), LounasError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl VoteStore for SqliteVoteStore {
    async fn find(&self, ts: &str, channel: &str) -> Result<Option<MessageEntry>, LounasError> {
        queries::messages::get_message(self.db()?, ts, channel).await
    }

    async fn create(&self, entry: &MessageEntry) -> Result<(), LounasError> {
        queries::messages::insert_message(self.db()?, entry).await
    }

    async fn add_vote(
        &self,
        ts: &str,
        channel: &str,
        vote: &VoteRecord,
    ) -> Result<MessageEntry, LounasError> {
        queries::votes::add_vote(self.db()?, ts, channel, vote).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use lounas_core::types::MenuSnapshot;
    use lounas_core::Restaurant;
    use tempfile::tempdir;

    use super::*;

    fn config(path: &std::path::Path) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string_lossy().into_owned(),
            wal_mode: true,
        }
    }

    async fn open_store(dir: &tempfile::TempDir) -> SqliteVoteStore {
        let store = SqliteVoteStore::new(config(&dir.path().join("votes.db")));
        store.initialize().await.unwrap();
        store
    }

    fn entry(ts: &str, channel: &str) -> MessageEntry {
        MessageEntry {
            ts: ts.to_string(),
            channel: channel.to_string(),
            menu: vec![MenuSnapshot {
                restaurant: Restaurant::Savo,
                items: Some(vec!["Lohikeitto".to_string()]),
            }],
            date: Utc.with_ymd_and_hms(2026, 10, 14, 8, 0, 0).unwrap(),
            votes: vec![],
        }
    }

    #[tokio::test]
    async fn uninitialized_store_reports_errors() {
        let dir = tempdir().unwrap();
        let store = SqliteVoteStore::new(config(&dir.path().join("never.db")));
        assert!(store.find("1", "C1").await.is_err());
        assert!(matches!(
            store.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }

    #[tokio::test]
    async fn initialize_creates_database_file_and_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("votes.db");
        let store = SqliteVoteStore::new(config(&path));
        store.initialize().await.unwrap();
        assert!(path.exists());
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
        assert!(store.initialize().await.is_err(), "second initialize must fail");
    }

    #[tokio::test]
    async fn find_returns_none_for_unknown_message() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        assert!(store.find("123.456", "C1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn created_entry_round_trips() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let original = entry("123.456", "C1");
        store.create(&original).await.unwrap();

        let found = store.find("123.456", "C1").await.unwrap().unwrap();
        assert_eq!(found, original);
        assert!(store.find("123.456", "C2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn votes_accumulate_in_cast_order() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        store.create(&entry("1.0", "C1")).await.unwrap();

        store
            .add_vote("1.0", "C1", &VoteRecord::new("U1", "upvote-savo"))
            .await
            .unwrap();
        let updated = store
            .add_vote("1.0", "C1", &VoteRecord::new("U2", "upvote-talli"))
            .await
            .unwrap();

        assert_eq!(
            updated.votes,
            vec![
                VoteRecord::new("U1", "upvote-savo"),
                VoteRecord::new("U2", "upvote-talli"),
            ]
        );
    }

    #[tokio::test]
    async fn duplicate_vote_is_stored_once() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        store.create(&entry("1.0", "C1")).await.unwrap();

        let vote = VoteRecord::new("U1", "upvote-savo");
        store.add_vote("1.0", "C1", &vote).await.unwrap();
        let updated = store.add_vote("1.0", "C1", &vote).await.unwrap();
        assert_eq!(updated.votes.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_duplicate_votes_are_stored_once() {
        let dir = tempdir().unwrap();
        let store = std::sync::Arc::new(open_store(&dir).await);
        store.create(&entry("1.0", "C1")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .add_vote("1.0", "C1", &VoteRecord::new("U1", "upvote-savo"))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let found = store.find("1.0", "C1").await.unwrap().unwrap();
        assert_eq!(found.votes.len(), 1);
    }

    #[tokio::test]
    async fn vote_on_unrecorded_message_fails() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        let result = store
            .add_vote("9.9", "C1", &VoteRecord::new("U1", "upvote-savo"))
            .await;
        assert!(matches!(result, Err(LounasError::Storage { .. })));
    }

    #[tokio::test]
    async fn create_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir).await;
        store.create(&entry("1.0", "C1")).await.unwrap();
        store
            .add_vote("1.0", "C1", &VoteRecord::new("U1", "upvote-savo"))
            .await
            .unwrap();
        store.create(&entry("1.0", "C1")).await.unwrap();

        let found = store.find("1.0", "C1").await.unwrap().unwrap();
        assert_eq!(found.votes.len(), 1);
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = open_store(&dir).await;
            store.create(&entry("1.0", "C1")).await.unwrap();
            store
                .add_vote("1.0", "C1", &VoteRecord::new("U1", "upvote-savo"))
                .await
                .unwrap();
            store.shutdown().await.unwrap();
        }
        let store = open_store(&dir).await;
        let found = store.find("1.0", "C1").await.unwrap().unwrap();
        assert!(found.has_vote("U1", "upvote-savo"));
    }
}
