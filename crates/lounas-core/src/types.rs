// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the adapter traits and the bot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::blocks::Block;

/// Prefix of the action value carried by every upvote button.
pub const VOTE_ACTION_PREFIX: &str = "upvote-";

/// Display name used when an action value does not map to a known restaurant.
pub const UNKNOWN_RESTAURANT: &str = "unknown";

/// A restaurant the bot knows how to fetch a menu for.
///
/// The lowercase identifier (`savo`, `talli`, ...) is used in configuration,
/// in button values and in the durable store.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Restaurant {
    Savo,
    Talli,
    Rami,
    August,
    Holvi,
    Vino,
    Fiorellina,
    Kasarmi,
}

impl Restaurant {
    /// Human readable name shown in menu sections and buttons.
    pub fn display_name(&self) -> &'static str {
        match self {
            Restaurant::Savo => "Ravintola Savo",
            Restaurant::Talli => "Ravintola Talli",
            Restaurant::Rami => "Rami's Coffee & Bistro",
            Restaurant::August => "Ravintola August",
            Restaurant::Holvi => "Holvi",
            Restaurant::Vino => "Vino Nobile",
            Restaurant::Fiorellina => "Pizzeria Fiorellina",
            Restaurant::Kasarmi => "Kasarmin Kantti",
        }
    }

    /// The action value carried by this restaurant's upvote button.
    pub fn vote_action(&self) -> String {
        format!("{VOTE_ACTION_PREFIX}{self}")
    }

    /// Reverse of [`Restaurant::vote_action`].
    pub fn from_vote_action(action: &str) -> Option<Self> {
        action
            .strip_prefix(VOTE_ACTION_PREFIX)
            .and_then(|id| id.parse().ok())
    }
}

/// Display name for a vote action value, or [`UNKNOWN_RESTAURANT`].
pub fn vote_action_display_name(action: &str) -> &'static str {
    Restaurant::from_vote_action(action)
        .map(|r| r.display_name())
        .unwrap_or(UNKNOWN_RESTAURANT)
}

/// One restaurant's fetched lunch listing for the day, or an error placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub restaurant: Restaurant,
    #[serde(default)]
    pub items: Option<Vec<String>>,
    /// Set when fetching this restaurant failed. Results carrying an error
    /// are usable for display but never cached.
    #[serde(default)]
    pub error: Option<String>,
    /// Date string as published by the source (e.g. "ma 14.10.").
    #[serde(default)]
    pub date: Option<String>,
    /// Additional restaurants are only rendered on demand.
    #[serde(default)]
    pub is_additional: bool,
}

impl MenuEntry {
    /// Successful entry with the given items.
    pub fn new(restaurant: Restaurant, items: Vec<String>) -> Self {
        Self {
            restaurant,
            items: Some(items),
            error: None,
            date: None,
            is_additional: false,
        }
    }

    /// Failed entry carrying an error description.
    pub fn failed(restaurant: Restaurant, error: impl Into<String>) -> Self {
        Self {
            restaurant,
            items: None,
            error: Some(error.into()),
            date: None,
            is_additional: false,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn additional(mut self) -> Self {
        self.is_additional = true;
        self
    }
}

/// A single accepted upvote.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoteRecord {
    pub user_id: String,
    /// Button value, e.g. `upvote-savo`.
    pub action: String,
}

impl VoteRecord {
    pub fn new(user_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            action: action.into(),
        }
    }
}

/// The menu of one restaurant as it was when the message was posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSnapshot {
    pub restaurant: Restaurant,
    pub items: Option<Vec<String>>,
}

impl From<&MenuEntry> for MenuSnapshot {
    fn from(entry: &MenuEntry) -> Self {
        Self {
            restaurant: entry.restaurant,
            items: entry.items.clone(),
        }
    }
}

/// Durable record of one posted menu message and its votes.
///
/// `ts` + `channel` uniquely identify the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub ts: String,
    pub channel: String,
    pub menu: Vec<MenuSnapshot>,
    pub date: DateTime<Utc>,
    pub votes: Vec<VoteRecord>,
}

impl MessageEntry {
    /// Whether `user_id` has already cast a vote for `action`.
    pub fn has_vote(&self, user_id: &str, action: &str) -> bool {
        self.votes
            .iter()
            .any(|v| v.user_id == user_id && v.action == action)
    }
}

/// Reference to a message that has been posted to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub channel: String,
    pub ts: String,
}

/// A plain chat message that may carry a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub channel: String,
    pub user: Option<String>,
    pub text: String,
    /// Edits, bot messages, joins etc. carry a subtype and are ignored.
    pub subtype: Option<String>,
}

/// A button click on one of the bot's interactive messages.
///
/// Fields the platform may omit are optional here; the handler rejects
/// actions that lack what it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockAction {
    pub action_id: String,
    pub value: Option<String>,
    pub user_id: String,
    pub user_name: Option<String>,
    pub channel_id: Option<String>,
    pub message_ts: Option<String>,
    pub blocks: Option<Vec<Block>>,
    pub response_url: String,
}

/// A new message or a full content replacement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundMessage {
    /// Notification fallback text.
    pub text: String,
    pub blocks: Vec<Block>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blocks: Vec::new(),
        }
    }
}

/// Reply to a block action through its response URL.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionResponse {
    /// Replace the original message in channel with new blocks.
    ReplaceOriginal { blocks: Vec<Block> },
    /// A notice only the acting user can see; the original is left intact.
    Ephemeral { text: String },
}

/// Content of a user's home tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub blocks: Vec<Block>,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the role of an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Chat,
    Provider,
    Storage,
}
