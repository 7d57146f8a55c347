// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lunch bot: command handling, voting and message upkeep.
//!
//! [`LounasBot`] is written against the adapter traits only. The binary
//! wires it to the HTTP menu provider, the SQLite or in-memory vote store
//! and the Slack client; tests wire it to the mocks in `lounas-test-utils`.

pub mod cache;
pub mod commands;
pub mod prefetch;
pub mod render;
pub mod shutdown;
pub mod truncation;
pub mod votes;

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use lounas_config::model::BotConfig;
use lounas_core::types::{ActionResponse, BlockAction, IncomingMessage, MenuSnapshot, OutboundMessage};
use lounas_core::{
    Block, ChatAdapter, LounasError, MenuProvider, MessageEntry, MessageRef, PluginAdapter,
    Restaurant, VoteRecord, VoteStore,
};

pub use cache::{CachedMenu, MenuCache};
pub use commands::Command;
pub use prefetch::PrefetchSchedule;
pub use truncation::TruncationScheduler;
pub use votes::{MemoryVoteStore, VoteTracker};

const MENU_UNAVAILABLE_TEXT: &str =
    ":warning: Could not fetch the lunch menus right now. Please try again later.";
const CACHE_CLEARED_TEXT: &str = "OK! Cache cleared";

/// Static bot settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct BotSettings {
    pub name: String,
    pub version: String,
    pub restaurants: Vec<Restaurant>,
    pub additional_restaurants: Vec<Restaurant>,
    pub display_voters: bool,
    pub git_url: String,
}

impl BotSettings {
    pub fn from_config(config: &BotConfig, version: impl Into<String>) -> Self {
        Self {
            name: config.name.clone(),
            version: version.into(),
            restaurants: config.restaurants.clone(),
            additional_restaurants: config.additional_restaurants.clone(),
            display_voters: config.display_voters,
            git_url: config.git_url.clone(),
        }
    }
}

/// What a channel message led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOutcome {
    /// No command, or a message with a subtype.
    Ignored,
    MenuPosted(MessageRef),
    /// The provider failed entirely; a warning was posted instead.
    MenuUnavailable,
    CacheCleared,
    Failed,
}

/// What a block action led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    VoteAccepted,
    /// The user had already cast this vote; they were told so privately.
    AlreadyVoted,
    RestaurantAdded,
    Acknowledged,
    /// Malformed payload or a failed platform call. Logged, nothing shown.
    Aborted,
    Ignored,
}

/// The lunch bot.
pub struct LounasBot {
    settings: BotSettings,
    cache: MenuCache,
    tracker: Arc<VoteTracker>,
    store: Arc<dyn VoteStore>,
    chat: Arc<dyn ChatAdapter>,
    truncation: Option<TruncationScheduler>,
    prefetch: Option<Arc<PrefetchSchedule>>,
}

impl LounasBot {
    pub fn new(
        settings: BotSettings,
        provider: Arc<dyn MenuProvider>,
        store: Arc<dyn VoteStore>,
        chat: Arc<dyn ChatAdapter>,
    ) -> Self {
        Self {
            settings,
            cache: MenuCache::new(provider),
            tracker: Arc::new(VoteTracker::new()),
            store,
            chat,
            truncation: None,
            prefetch: None,
        }
    }

    /// Remove posted menus after the scheduler's delay.
    pub fn with_truncation(mut self, scheduler: TruncationScheduler) -> Self {
        self.truncation = Some(
            scheduler
                .with_tracker(self.tracker.clone())
                .with_store(self.store.clone()),
        );
        self
    }

    /// Show the next prefetch time on the home tab.
    pub fn with_prefetch_schedule(mut self, schedule: Arc<PrefetchSchedule>) -> Self {
        self.prefetch = Some(schedule);
        self
    }

    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    pub fn cache(&self) -> &MenuCache {
        &self.cache
    }

    pub fn tracker(&self) -> &VoteTracker {
        &self.tracker
    }

    pub fn truncation(&self) -> Option<&TruncationScheduler> {
        self.truncation.as_ref()
    }

    /// Warm today's cache slot. Returns the number of entries fetched.
    pub async fn prefetch(&self) -> Result<usize, LounasError> {
        let menu = self.fetch_menu().await?;
        Ok(menu.data.len())
    }

    async fn fetch_menu(&self) -> Result<CachedMenu, LounasError> {
        self.cache
            .get_or_fetch(
                &self.settings.restaurants,
                &self.settings.additional_restaurants,
            )
            .await
    }

    // --- Messages ---

    /// Handle a channel message. Errors are logged, never returned.
    pub async fn handle_message(&self, message: &IncomingMessage) -> MessageOutcome {
        if message.subtype.is_some() {
            return MessageOutcome::Ignored;
        }
        let Some(command) = Command::parse(&message.text) else {
            return MessageOutcome::Ignored;
        };
        debug!(?command, channel = %message.channel, user = ?message.user, "command received");

        match command {
            Command::ClearCache => {
                self.cache.clear().await;
                if let Err(e) = self
                    .chat
                    .post_message(&message.channel, &OutboundMessage::text(CACHE_CLEARED_TEXT))
                    .await
                {
                    warn!(error = %e, "failed to confirm cache clear");
                }
                MessageOutcome::CacheCleared
            }
            Command::Menu => match self
                .post_menu(&message.channel, message.user.as_deref())
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(channel = %message.channel, error = %e, "failed to post menu");
                    MessageOutcome::Failed
                }
            },
        }
    }

    async fn post_menu(
        &self,
        channel: &str,
        requester: Option<&str>,
    ) -> Result<MessageOutcome, LounasError> {
        let menu = match self.fetch_menu().await {
            Ok(menu) => menu,
            Err(e) => {
                warn!(error = %e, "menu fetch failed");
                self.chat
                    .post_message(channel, &OutboundMessage::text(MENU_UNAVAILABLE_TEXT))
                    .await?;
                return Ok(MessageOutcome::MenuUnavailable);
            }
        };

        let mut blocks = menu.blocks;
        blocks.push(render::request_context(
            requester,
            self.truncation.as_ref().map(TruncationScheduler::delay),
        ));
        let posted = self
            .chat
            .post_message(channel, &OutboundMessage { text: menu.text, blocks })
            .await?;
        info!(channel = %posted.channel, ts = %posted.ts, "menu posted");

        let entry = MessageEntry {
            ts: posted.ts.clone(),
            channel: posted.channel.clone(),
            menu: menu.data.iter().map(MenuSnapshot::from).collect(),
            date: Utc::now(),
            votes: Vec::new(),
        };
        if let Err(e) = self.store.create(&entry).await {
            warn!(ts = %entry.ts, error = %e, "failed to record posted menu, votes will be tracked in memory");
        }

        if let Some(truncation) = &self.truncation {
            truncation.schedule(posted.clone()).await;
        }
        Ok(MessageOutcome::MenuPosted(posted))
    }

    // --- Actions ---

    /// Handle a button click. Errors are logged, never returned.
    pub async fn handle_action(&self, action: &BlockAction) -> ActionOutcome {
        let result = if action.action_id == render::UPVOTE_ACTION_ID {
            self.handle_vote(action).await
        } else if let Some(id) = action.action_id.strip_prefix(render::FETCH_ADDITIONAL_PREFIX) {
            match id.parse::<Restaurant>() {
                Ok(r) if self.settings.additional_restaurants.contains(&r) => {
                    self.handle_fetch_additional(action, r).await
                }
                _ => {
                    debug!(action_id = %action.action_id, "not a configured additional restaurant");
                    Ok(ActionOutcome::Ignored)
                }
            }
        } else if action.action_id == render::LINK_ACTION_ID {
            debug!(user = %action.user_id, "project link opened");
            Ok(ActionOutcome::Acknowledged)
        } else {
            debug!(action_id = %action.action_id, "unhandled action");
            Ok(ActionOutcome::Ignored)
        };

        result.unwrap_or_else(|e| {
            error!(action_id = %action.action_id, user = %action.user_id, error = %e, "action aborted");
            ActionOutcome::Aborted
        })
    }

    /// Durable record of a message, or `None` on a miss or a store failure.
    async fn lookup(&self, ts: &str, channel: &str) -> Option<MessageEntry> {
        match self.store.find(ts, channel).await {
            Ok(found) => found,
            Err(e) => {
                warn!(%ts, %channel, error = %e, "vote store lookup failed, using in-process votes");
                None
            }
        }
    }

    async fn handle_vote(&self, action: &BlockAction) -> Result<ActionOutcome, LounasError> {
        let target = ActionTarget::from_action(action)?;
        let value = target.value;
        let user = action.user_id.as_str();
        debug!(%value, user = %action.user_name.as_deref().unwrap_or(user), "vote received");

        let record = self.lookup(target.ts, target.channel).await;

        // A vote the store failed to save lives only in the tracker.
        let duplicate = match &record {
            Some(entry) => {
                entry.has_vote(user, value) || self.tracker.has_voted(target.ts, user, value).await
            }
            None => self.tracker.has_voted(target.ts, user, value).await,
        };
        if duplicate {
            debug!(%value, %user, "already voted");
            self.chat
                .respond(
                    &action.response_url,
                    &ActionResponse::Ephemeral {
                        text: render::already_voted_text(user, value),
                    },
                )
                .await?;
            return Ok(ActionOutcome::AlreadyVoted);
        }

        let mut blocks = target.blocks;
        let display_voters = self.settings.display_voters;
        if record.is_some() {
            match self
                .store
                .add_vote(target.ts, target.channel, &VoteRecord::new(user, value))
                .await
            {
                Ok(updated) => render::apply_tallies(&mut blocks, &updated.votes, display_voters),
                Err(e) => {
                    warn!(error = %e, "failed to store vote, updating message in place");
                    render::apply_single_vote(&mut blocks, value, user, display_voters)?;
                }
            }
        } else {
            render::apply_single_vote(&mut blocks, value, user, display_voters)?;
        }

        let responded = self
            .chat
            .respond(&action.response_url, &ActionResponse::ReplaceOriginal { blocks })
            .await;
        self.tracker.record(target.ts, user, value).await;
        responded?;
        Ok(ActionOutcome::VoteAccepted)
    }

    async fn handle_fetch_additional(
        &self,
        action: &BlockAction,
        restaurant: Restaurant,
    ) -> Result<ActionOutcome, LounasError> {
        let target = ActionTarget::from_action(action)?;
        debug!(%restaurant, user = %action.user_id, "additional restaurant requested");

        let menu = self.fetch_menu().await?;
        let entry = menu.entry(restaurant).ok_or_else(|| {
            LounasError::Internal(format!("no menu data for restaurant {restaurant}"))
        })?;

        let mut blocks = target.blocks;
        render::insert_additional(&mut blocks, entry)?;

        if let Some(record) = self.lookup(target.ts, target.channel).await {
            render::apply_tallies(&mut blocks, &record.votes, self.settings.display_voters);
        }

        self.chat
            .respond(&action.response_url, &ActionResponse::ReplaceOriginal { blocks })
            .await?;
        Ok(ActionOutcome::RestaurantAdded)
    }

    // --- Home tab ---

    /// Publish the home tab for `user_id`. Errors are logged.
    pub async fn handle_home_opened(&self, user_id: &str) {
        let provider = self.cache.provider();
        let info = render::HomeInfo {
            bot_name: self.settings.name.clone(),
            version: self.settings.version.clone(),
            git_url: self.settings.git_url.clone(),
            provider: Some((provider.name().to_string(), provider.base_url().to_string())),
            next_prefetch: self
                .prefetch
                .as_ref()
                .and_then(|s| s.next_after(Utc::now()))
                .map(|t| t.format("%Y-%m-%d %H:%M %Z").to_string()),
        };
        if let Err(e) = self
            .chat
            .publish_home(user_id, &render::home_view(user_id, &info))
            .await
        {
            warn!(%user_id, error = %e, "failed to publish home tab");
        }
    }
}

/// The parts of a block action every message-rewriting handler needs.
struct ActionTarget<'a> {
    value: &'a str,
    channel: &'a str,
    ts: &'a str,
    blocks: Vec<Block>,
}

impl<'a> ActionTarget<'a> {
    fn from_action(action: &'a BlockAction) -> Result<Self, LounasError> {
        let value = action
            .value
            .as_deref()
            .ok_or_else(|| LounasError::MalformedMessage("action has no value".into()))?;
        let channel = action
            .channel_id
            .as_deref()
            .ok_or_else(|| LounasError::MalformedMessage("action is not from a channel".into()))?;
        let ts = action
            .message_ts
            .as_deref()
            .ok_or_else(|| LounasError::MalformedMessage("action has no message".into()))?;
        let blocks = action
            .blocks
            .clone()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| LounasError::MalformedMessage("message has no blocks".into()))?;
        Ok(Self {
            value,
            channel,
            ts,
            blocks,
        })
    }
}
