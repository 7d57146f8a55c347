// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process vote bookkeeping.
//!
//! [`VoteTracker`] remembers who voted what per message for the lifetime of
//! the process. It is consulted whenever the vote store has no record of a
//! message, and every accepted vote is written to it.
//!
//! [`MemoryVoteStore`] is the [`VoteStore`] used when the database is
//! disabled. Its entries are dropped when their message is removed.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use lounas_core::{
    AdapterType, HealthStatus, LounasError, MessageEntry, PluginAdapter, VoteRecord, VoteStore,
};

/// Message ts -> user id -> actions voted.
#[derive(Default)]
pub struct VoteTracker {
    voters: Mutex<HashMap<String, HashMap<String, Vec<String>>>>,
}

impl VoteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn has_voted(&self, ts: &str, user_id: &str, action: &str) -> bool {
        self.voters
            .lock()
            .await
            .get(ts)
            .and_then(|users| users.get(user_id))
            .is_some_and(|actions| actions.iter().any(|a| a == action))
    }

    /// Remember a vote. Recording the same vote twice keeps one copy.
    pub async fn record(&self, ts: &str, user_id: &str, action: &str) {
        let mut voters = self.voters.lock().await;
        let actions = voters
            .entry(ts.to_string())
            .or_default()
            .entry(user_id.to_string())
            .or_default();
        if !actions.iter().any(|a| a == action) {
            actions.push(action.to_string());
        }
    }

    /// Actions `user_id` has voted on message `ts`.
    pub async fn votes_of(&self, ts: &str, user_id: &str) -> Vec<String> {
        self.voters
            .lock()
            .await
            .get(ts)
            .and_then(|users| users.get(user_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Forget one message, e.g. after its content was removed.
    pub async fn forget(&self, ts: &str) {
        self.voters.lock().await.remove(ts);
    }

    pub async fn clear(&self) {
        self.voters.lock().await.clear();
    }
}

/// [`VoteStore`] kept in memory, lost on restart.
#[derive(Default)]
pub struct MemoryVoteStore {
    entries: Mutex<HashMap<(String, String), MessageEntry>>,
}

impl MemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PluginAdapter for MemoryVoteStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, LounasError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl VoteStore for MemoryVoteStore {
    async fn find(&self, ts: &str, channel: &str) -> Result<Option<MessageEntry>, LounasError> {
        Ok(self
            .entries
            .lock()
            .await
            .get(&(ts.to_string(), channel.to_string()))
            .cloned())
    }

    async fn create(&self, entry: &MessageEntry) -> Result<(), LounasError> {
        self.entries
            .lock()
            .await
            .entry((entry.ts.clone(), entry.channel.clone()))
            .or_insert_with(|| entry.clone());
        Ok(())
    }

    async fn add_vote(
        &self,
        ts: &str,
        channel: &str,
        vote: &VoteRecord,
    ) -> Result<MessageEntry, LounasError> {
        let mut entries = self.entries.lock().await;
        let entry = entries
            .get_mut(&(ts.to_string(), channel.to_string()))
            .ok_or_else(|| LounasError::storage("message has not been recorded"))?;
        if !entry.has_vote(&vote.user_id, &vote.action) {
            entry.votes.push(vote.clone());
        }
        Ok(entry.clone())
    }

    async fn release(&self, ts: &str, channel: &str) -> Result<(), LounasError> {
        self.entries
            .lock()
            .await
            .remove(&(ts.to_string(), channel.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracker_records_per_message_and_user() {
        let tracker = VoteTracker::new();
        assert!(!tracker.has_voted("100", "U1", "upvote-savo").await);

        tracker.record("100", "U1", "upvote-savo").await;
        tracker.record("100", "U1", "upvote-savo").await;

        assert!(tracker.has_voted("100", "U1", "upvote-savo").await);
        assert!(!tracker.has_voted("100", "U1", "upvote-talli").await);
        assert!(!tracker.has_voted("100", "U2", "upvote-savo").await);
        assert!(!tracker.has_voted("200", "U1", "upvote-savo").await);
        assert_eq!(tracker.votes_of("100", "U1").await, vec!["upvote-savo"]);
    }

    #[tokio::test]
    async fn tracker_forget_and_clear() {
        let tracker = VoteTracker::new();
        tracker.record("100", "U1", "upvote-savo").await;
        tracker.record("200", "U1", "upvote-savo").await;

        tracker.forget("100").await;
        assert!(!tracker.has_voted("100", "U1", "upvote-savo").await);
        assert!(tracker.has_voted("200", "U1", "upvote-savo").await);

        tracker.clear().await;
        assert!(tracker.votes_of("200", "U1").await.is_empty());
    }

    fn entry(ts: &str) -> MessageEntry {
        MessageEntry {
            ts: ts.into(),
            channel: "C1".into(),
            menu: vec![],
            date: chrono::Utc::now(),
            votes: vec![],
        }
    }

    #[tokio::test]
    async fn memory_store_appends_each_vote_once() {
        let store = MemoryVoteStore::new();
        store.create(&entry("1")).await.unwrap();

        let vote = VoteRecord::new("U1", "upvote-savo");
        store.add_vote("1", "C1", &vote).await.unwrap();
        let updated = store.add_vote("1", "C1", &vote).await.unwrap();
        assert_eq!(updated.votes, vec![vote]);

        assert!(store.find("1", "C2").await.unwrap().is_none());
        assert!(store.add_vote("2", "C1", &VoteRecord::new("U1", "x")).await.is_err());
    }

    #[tokio::test]
    async fn memory_store_create_keeps_existing_votes() {
        let store = MemoryVoteStore::new();
        store.create(&entry("1")).await.unwrap();
        store
            .add_vote("1", "C1", &VoteRecord::new("U1", "upvote-savo"))
            .await
            .unwrap();
        store.create(&entry("1")).await.unwrap();
        assert_eq!(store.find("1", "C1").await.unwrap().unwrap().votes.len(), 1);
    }

    #[tokio::test]
    async fn memory_store_release_drops_only_that_message() {
        let store = MemoryVoteStore::new();
        store.create(&entry("1")).await.unwrap();
        store.create(&entry("2")).await.unwrap();

        store.release("1", "C1").await.unwrap();
        assert!(store.find("1", "C1").await.unwrap().is_none());
        assert!(store.find("2", "C1").await.unwrap().is_some());
        store.release("1", "C1").await.unwrap();
    }
}
