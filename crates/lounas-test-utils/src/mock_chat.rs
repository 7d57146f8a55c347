// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock chat adapter capturing outbound calls for assertion in tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use lounas_core::types::{ActionResponse, AdapterType, HealthStatus, HomeView, OutboundMessage};
use lounas_core::{ChatAdapter, LounasError, MessageRef, PluginAdapter};

/// A chat platform that records every call.
///
/// Posted messages get increasing timestamps `"1000.000001"`,
/// `"1000.000002"`, ... Posts and updates can be switched to fail.
pub struct MockChat {
    posts: Arc<Mutex<Vec<(String, OutboundMessage)>>>,
    updates: Arc<Mutex<Vec<(MessageRef, OutboundMessage)>>>,
    responses: Arc<Mutex<Vec<(String, ActionResponse)>>>,
    homes: Arc<Mutex<Vec<(String, HomeView)>>>,
    next_ts: AtomicU64,
    fail_posts: AtomicBool,
    fail_updates: AtomicBool,
}

impl MockChat {
    pub fn new() -> Self {
        Self {
            posts: Arc::new(Mutex::new(Vec::new())),
            updates: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(Vec::new())),
            homes: Arc::new(Mutex::new(Vec::new())),
            next_ts: AtomicU64::new(1),
            fail_posts: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
        }
    }

    /// Make `post_message` fail until switched back.
    pub fn fail_posts(&self, fail: bool) {
        self.fail_posts.store(fail, Ordering::SeqCst);
    }

    /// Make `update_message` fail until switched back.
    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// `(channel, message)` for every successful post.
    pub async fn posts(&self) -> Vec<(String, OutboundMessage)> {
        self.posts.lock().await.clone()
    }

    /// `(target, replacement)` for every successful update.
    pub async fn updates(&self) -> Vec<(MessageRef, OutboundMessage)> {
        self.updates.lock().await.clone()
    }

    /// `(response_url, response)` for every action response.
    pub async fn responses(&self) -> Vec<(String, ActionResponse)> {
        self.responses.lock().await.clone()
    }

    /// `(user_id, view)` for every published home tab.
    pub async fn homes(&self) -> Vec<(String, HomeView)> {
        self.homes.lock().await.clone()
    }
}

impl Default for MockChat {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChat {
    fn name(&self) -> &str {
        "mock-chat"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Chat
    }

    async fn health_check(&self) -> Result<HealthStatus, LounasError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChatAdapter for MockChat {
    async fn post_message(
        &self,
        channel: &str,
        message: &OutboundMessage,
    ) -> Result<MessageRef, LounasError> {
        if self.fail_posts.load(Ordering::SeqCst) {
            return Err(LounasError::chat("mock post failure"));
        }
        let n = self.next_ts.fetch_add(1, Ordering::SeqCst);
        self.posts
            .lock()
            .await
            .push((channel.to_string(), message.clone()));
        Ok(MessageRef {
            channel: channel.to_string(),
            ts: format!("1000.{n:06}"),
        })
    }

    async fn update_message(
        &self,
        target: &MessageRef,
        message: &OutboundMessage,
    ) -> Result<(), LounasError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(LounasError::chat("mock update failure"));
        }
        self.updates
            .lock()
            .await
            .push((target.clone(), message.clone()));
        Ok(())
    }

    async fn respond(
        &self,
        response_url: &str,
        response: &ActionResponse,
    ) -> Result<(), LounasError> {
        self.responses
            .lock()
            .await
            .push((response_url.to_string(), response.clone()));
        Ok(())
    }

    async fn publish_home(&self, user_id: &str, view: &HomeView) -> Result<(), LounasError> {
        self.homes
            .lock()
            .await
            .push((user_id.to_string(), view.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn posts_get_increasing_timestamps() {
        let chat = MockChat::new();
        let a = chat.post_message("C1", &OutboundMessage::text("a")).await.unwrap();
        let b = chat.post_message("C1", &OutboundMessage::text("b")).await.unwrap();
        assert!(a.ts < b.ts);
        assert_eq!(chat.posts().await.len(), 2);
    }

    #[tokio::test]
    async fn failing_posts_are_not_captured() {
        let chat = MockChat::new();
        chat.fail_posts(true);
        assert!(chat.post_message("C1", &OutboundMessage::text("a")).await.is_err());
        assert!(chat.posts().await.is_empty());
    }
}
