// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delayed removal of posted menu messages.
//!
//! Every scheduled removal owns a timer bound to its own message, so
//! removals never depend on timers firing in the order they were armed.
//! The pending list only reflects what is still waiting.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use lounas_core::types::OutboundMessage;
use lounas_core::{ChatAdapter, MessageRef, VoteStore};

use crate::render::TRUNCATED_TEXT;
use crate::votes::VoteTracker;

/// Replaces posted messages with a placeholder after a fixed delay.
#[derive(Clone)]
pub struct TruncationScheduler {
    chat: Arc<dyn ChatAdapter>,
    delay: Duration,
    pending: Arc<Mutex<VecDeque<MessageRef>>>,
    tracker: Option<Arc<VoteTracker>>,
    store: Option<Arc<dyn VoteStore>>,
    cancel: CancellationToken,
}

impl TruncationScheduler {
    /// Timers stop without firing once `cancel` is cancelled.
    pub fn new(chat: Arc<dyn ChatAdapter>, delay: Duration, cancel: CancellationToken) -> Self {
        Self {
            chat,
            delay,
            pending: Arc::new(Mutex::new(VecDeque::new())),
            tracker: None,
            store: None,
            cancel,
        }
    }

    /// Forget the in-process votes of a message once it has been removed.
    pub fn with_tracker(mut self, tracker: Arc<VoteTracker>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Release the store's entry for a message once it has been removed.
    pub fn with_store(mut self, store: Arc<dyn VoteStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm a removal timer for `target`.
    pub async fn schedule(&self, target: MessageRef) {
        self.pending.lock().await.push_back(target.clone());
        debug!(channel = %target.channel, ts = %target.ts, delay = ?self.delay, "removal scheduled");

        let this = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(this.delay) => this.fire(target).await,
                _ = this.cancel.cancelled() => {
                    debug!(channel = %target.channel, ts = %target.ts, "removal cancelled by shutdown");
                }
            }
        });
    }

    async fn fire(&self, target: MessageRef) {
        {
            let mut pending = self.pending.lock().await;
            if let Some(pos) = pending.iter().position(|p| *p == target) {
                pending.remove(pos);
            }
        }

        let placeholder = OutboundMessage::text(TRUNCATED_TEXT);
        match self.chat.update_message(&target, &placeholder).await {
            Ok(()) => {
                info!(channel = %target.channel, ts = %target.ts, "menu message removed");
                if let Some(tracker) = &self.tracker {
                    tracker.forget(&target.ts).await;
                }
                if let Some(store) = &self.store
                    && let Err(e) = store.release(&target.ts, &target.channel).await
                {
                    warn!(ts = %target.ts, error = %e, "failed to release vote store entry");
                }
            }
            Err(e) => {
                warn!(channel = %target.channel, ts = %target.ts, error = %e, "failed to remove menu message");
            }
        }
    }

    /// Messages still waiting for removal, oldest first.
    pub async fn pending(&self) -> Vec<MessageRef> {
        self.pending.lock().await.iter().cloned().collect()
    }
}
