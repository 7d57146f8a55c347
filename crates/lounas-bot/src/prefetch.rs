// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scheduled cache warming.
//!
//! Fetches the day's menus ahead of the first request so that request is
//! a cache hit. A failed prefetch is only logged.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use croner::Cron;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use lounas_core::LounasError;

use crate::LounasBot;

/// A cron expression evaluated in a fixed time zone.
pub struct PrefetchSchedule {
    cron: Cron,
    tz: Tz,
}

impl PrefetchSchedule {
    pub fn new(pattern: &str, timezone: &str) -> Result<Self, LounasError> {
        let cron = pattern
            .parse::<Cron>()
            .map_err(|e| LounasError::Config(format!("invalid prefetch schedule `{pattern}`: {e}")))?;
        let tz = timezone
            .parse::<Tz>()
            .map_err(|e| LounasError::Config(format!("invalid prefetch timezone `{timezone}`: {e}")))?;
        Ok(Self { cron, tz })
    }

    /// First run strictly after `now`.
    pub fn next_after(&self, now: DateTime<Utc>) -> Option<DateTime<Tz>> {
        self.cron
            .find_next_occurrence(&now.with_timezone(&self.tz), false)
            .ok()
    }
}

/// Run prefetches on `schedule` until `cancel` fires.
pub async fn run_prefetch_loop(
    bot: Arc<LounasBot>,
    schedule: Arc<PrefetchSchedule>,
    cancel: CancellationToken,
) {
    loop {
        let now = Utc::now();
        let Some(next) = schedule.next_after(now) else {
            warn!("prefetch schedule has no future occurrence, stopping");
            return;
        };
        let wait = (next.with_timezone(&Utc) - now)
            .to_std()
            .unwrap_or_default();
        debug!(next = %next, "next prefetch scheduled");

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = cancel.cancelled() => {
                debug!("prefetch loop stopped");
                return;
            }
        }

        match bot.prefetch().await {
            Ok(entries) => info!(entries, "menus prefetched"),
            Err(e) => warn!(error = %e, "prefetch failed"),
        }
    }
}
