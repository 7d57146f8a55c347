// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat adapter trait for the outbound side of the messaging platform.

use async_trait::async_trait;

use crate::error::LounasError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ActionResponse, HomeView, MessageRef, OutboundMessage};

/// Outbound operations against the messaging platform.
#[async_trait]
pub trait ChatAdapter: PluginAdapter {
    /// Posts a new message to a channel.
    async fn post_message(
        &self,
        channel: &str,
        message: &OutboundMessage,
    ) -> Result<MessageRef, LounasError>;

    /// Replaces the content of an existing message.
    async fn update_message(
        &self,
        target: &MessageRef,
        message: &OutboundMessage,
    ) -> Result<(), LounasError>;

    /// Answers an interaction through its response URL.
    async fn respond(
        &self,
        response_url: &str,
        response: &ActionResponse,
    ) -> Result<(), LounasError>;

    /// Publishes a user's home tab.
    async fn publish_home(&self, user_id: &str, view: &HomeView) -> Result<(), LounasError>;
}
