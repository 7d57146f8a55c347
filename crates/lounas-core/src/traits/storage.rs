// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vote store trait for persisting posted messages and their votes.

use async_trait::async_trait;

use crate::error::LounasError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MessageEntry, VoteRecord};

/// Record of posted menu messages and the votes cast on them.
///
/// Every method is fallible; callers must treat failures as a lookup miss
/// and fall back to in-process bookkeeping rather than aborting.
#[async_trait]
pub trait VoteStore: PluginAdapter {
    /// Looks up the entry for a message, `None` if it was never recorded.
    async fn find(&self, ts: &str, channel: &str) -> Result<Option<MessageEntry>, LounasError>;

    /// Records a newly posted message.
    async fn create(&self, entry: &MessageEntry) -> Result<(), LounasError>;

    /// Appends a vote and returns the updated entry.
    async fn add_vote(
        &self,
        ts: &str,
        channel: &str,
        vote: &VoteRecord,
    ) -> Result<MessageEntry, LounasError>;

    /// Called once a message's content has been removed from the channel.
    ///
    /// Durable stores keep the history; the default does nothing.
    async fn release(&self, _ts: &str, _channel: &str) -> Result<(), LounasError> {
        Ok(())
    }
}
