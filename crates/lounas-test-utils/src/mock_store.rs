// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vote stores that fail on purpose.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use lounas_core::types::{AdapterType, HealthStatus};
use lounas_core::{LounasError, MessageEntry, PluginAdapter, VoteRecord, VoteStore};

/// Every call fails with a storage error.
#[derive(Debug, Default)]
pub struct FailingVoteStore;

#[async_trait]
impl PluginAdapter for FailingVoteStore {
    fn name(&self) -> &str {
        "failing-store"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, LounasError> {
        Ok(HealthStatus::Unhealthy("always failing".into()))
    }
}

#[async_trait]
impl VoteStore for FailingVoteStore {
    async fn find(&self, _ts: &str, _channel: &str) -> Result<Option<MessageEntry>, LounasError> {
        Err(LounasError::storage("store unavailable"))
    }

    async fn create(&self, _entry: &MessageEntry) -> Result<(), LounasError> {
        Err(LounasError::storage("store unavailable"))
    }

    async fn add_vote(
        &self,
        _ts: &str,
        _channel: &str,
        _vote: &VoteRecord,
    ) -> Result<MessageEntry, LounasError> {
        Err(LounasError::storage("store unavailable"))
    }
}

/// Finds and records messages in memory, but every `add_vote` fails.
///
/// Models a store that went down between posting a menu and the first vote.
#[derive(Debug, Default)]
pub struct VoteWriteFailingStore {
    entries: Mutex<HashMap<(String, String), MessageEntry>>,
}

impl VoteWriteFailingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PluginAdapter for VoteWriteFailingStore {
    fn name(&self) -> &str {
        "vote-write-failing-store"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, LounasError> {
        Ok(HealthStatus::Degraded("vote writes failing".into()))
    }
}

#[async_trait]
impl VoteStore for VoteWriteFailingStore {
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
            .insert((entry.ts.clone(), entry.channel.clone()), entry.clone());
        Ok(())
    }

    async fn add_vote(
        &self,
        _ts: &str,
        _channel: &str,
        _vote: &VoteRecord,
    ) -> Result<MessageEntry, LounasError> {
        Err(LounasError::storage("vote write failed"))
    }
}
