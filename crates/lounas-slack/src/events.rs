// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for Events API callbacks and interactivity payloads, and
//! their conversion into the bot's own types.

use serde::Deserialize;
use tracing::warn;

use lounas_core::Block;
use lounas_core::types::{BlockAction, IncomingMessage};

/// Outer envelope of an Events API request.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    UrlVerification { challenge: String },
    EventCallback { event: Event },
    #[serde(other)]
    Other,
}

/// The events the bot subscribes to.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Message {
        channel: String,
        #[serde(default)]
        user: Option<String>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        subtype: Option<String>,
    },
    AppHomeOpened {
        user: String,
        #[serde(default)]
        tab: Option<String>,
    },
    #[serde(other)]
    Other,
}

/// What the bot should do with a verified event.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Message(IncomingMessage),
    HomeOpened { user_id: String },
    Nothing,
}

impl Event {
    pub fn into_dispatch(self) -> Dispatch {
        match self {
            Event::Message {
                channel,
                user,
                text,
                subtype,
            } => Dispatch::Message(IncomingMessage {
                channel,
                user,
                text: text.unwrap_or_default(),
                subtype,
            }),
            Event::AppHomeOpened { user, tab } if tab.as_deref().is_none_or(|t| t == "home") => {
                Dispatch::HomeOpened { user_id: user }
            }
            Event::AppHomeOpened { .. } | Event::Other => Dispatch::Nothing,
        }
    }
}

/// Form body of an interactivity request: `payload=<json>`.
#[derive(Debug, Deserialize)]
pub struct InteractionForm {
    pub payload: String,
}

/// Interactivity payload. Only `block_actions` is acted on.
#[derive(Debug, Deserialize)]
pub struct InteractionPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub user: PayloadUser,
    #[serde(default)]
    pub channel: Option<PayloadChannel>,
    #[serde(default)]
    pub container: Option<PayloadContainer>,
    #[serde(default)]
    pub message: Option<PayloadMessage>,
    #[serde(default)]
    pub actions: Vec<PayloadAction>,
    #[serde(default)]
    pub response_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PayloadUser {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PayloadChannel {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct PayloadContainer {
    #[serde(default)]
    pub message_ts: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PayloadMessage {
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub blocks: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct PayloadAction {
    pub action_id: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl InteractionPayload {
    /// One [`BlockAction`] per clicked action. Empty for any other payload type.
    pub fn into_block_actions(self) -> Vec<BlockAction> {
        if self.kind != "block_actions" {
            return Vec::new();
        }

        let channel_id = self
            .channel
            .map(|c| c.id)
            .or_else(|| self.container.as_ref().and_then(|c| c.channel_id.clone()));
        let message_ts = self
            .message
            .as_ref()
            .and_then(|m| m.ts.clone())
            .or_else(|| self.container.as_ref().and_then(|c| c.message_ts.clone()));
        let blocks = self
            .message
            .and_then(|m| m.blocks)
            .and_then(|raw| match serde_json::from_value::<Vec<Block>>(raw) {
                Ok(blocks) => Some(blocks),
                Err(e) => {
                    warn!(error = %e, "message blocks could not be read");
                    None
                }
            });
        let user_name = self.user.username.or(self.user.name);
        let response_url = self.response_url.unwrap_or_default();

        self.actions
            .into_iter()
            .map(|a| BlockAction {
                action_id: a.action_id,
                value: a.value,
                user_id: self.user.id.clone(),
                user_name: user_name.clone(),
                channel_id: channel_id.clone(),
                message_ts: message_ts.clone(),
                blocks: blocks.clone(),
                response_url: response_url.clone(),
            })
            .collect()
    }
}
