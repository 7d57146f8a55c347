// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-day memoization of fetched menus and their rendered blocks.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use lounas_core::{Block, LounasError, MenuEntry, MenuProvider, Restaurant};

use crate::render;

/// A day's menu as fetched and rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedMenu {
    pub data: Vec<MenuEntry>,
    /// Header text, also used as the notification fallback.
    pub text: String,
    pub blocks: Vec<Block>,
}

impl CachedMenu {
    pub fn has_errors(&self) -> bool {
        self.data.iter().any(|e| e.error.is_some())
    }

    pub fn entry(&self, restaurant: Restaurant) -> Option<&MenuEntry> {
        self.data.iter().find(|e| e.restaurant == restaurant)
    }
}

/// Cache slot key for the UTC calendar day of `now`.
pub fn day_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Menu results memoized by UTC day.
///
/// Callers always receive a copy, so splicing blocks for one message never
/// touches what later requests get. Results containing a failed entry are
/// returned but never stored.
pub struct MenuCache {
    provider: Arc<dyn MenuProvider>,
    slots: Mutex<HashMap<String, CachedMenu>>,
}

impl MenuCache {
    pub fn new(provider: Arc<dyn MenuProvider>) -> Self {
        Self {
            provider,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn provider(&self) -> &Arc<dyn MenuProvider> {
        &self.provider
    }

    /// Today's menu, fetched on the first request of the day.
    pub async fn get_or_fetch(
        &self,
        restaurants: &[Restaurant],
        additional: &[Restaurant],
    ) -> Result<CachedMenu, LounasError> {
        self.get_or_fetch_at(restaurants, additional, Utc::now()).await
    }

    /// [`MenuCache::get_or_fetch`] with an explicit clock.
    pub async fn get_or_fetch_at(
        &self,
        restaurants: &[Restaurant],
        additional: &[Restaurant],
        now: DateTime<Utc>,
    ) -> Result<CachedMenu, LounasError> {
        let key = day_key(now);
        if let Some(hit) = self.slots.lock().await.get(&key) {
            debug!(%key, "menu cache hit");
            return Ok(hit.clone());
        }

        let data = self.provider.get_data(restaurants, additional).await?;
        let text = render::header_text(&data);
        let blocks = render::build_menu(&data, additional);
        let menu = CachedMenu { data, text, blocks };

        if menu.has_errors() {
            warn!(%key, "menu contains failed entries, not caching");
            return Ok(menu);
        }

        info!(%key, entries = menu.data.len(), "menu cached");
        self.slots.lock().await.insert(key, menu.clone());
        Ok(menu)
    }

    /// Drop every cached day.
    pub async fn clear(&self) {
        let mut slots = self.slots.lock().await;
        let dropped = slots.len();
        slots.clear();
        info!(dropped, "menu cache cleared");
    }

    /// Number of cached days.
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use lounas_test_utils::MockMenuProvider;

    use super::*;

    const DEFAULTS: &[Restaurant] = &[Restaurant::Savo, Restaurant::Talli, Restaurant::Rami];

    fn day(d: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, d, hour, 0, 0).unwrap()
    }

    fn ok_entries() -> Vec<MenuEntry> {
        DEFAULTS
            .iter()
            .map(|r| MenuEntry::new(*r, vec![format!("{r} soup")]))
            .collect()
    }

    #[test]
    fn day_key_uses_utc_date() {
        assert_eq!(day_key(day(14, 23)), "2026-10-14");
        let helsinki_midnight = chrono::FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 15, 1, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(day_key(helsinki_midnight), "2026-10-14");
    }

    #[tokio::test]
    async fn same_day_is_served_from_cache() {
        let provider = Arc::new(MockMenuProvider::new(ok_entries()));
        let cache = MenuCache::new(provider.clone());

        let first = cache.get_or_fetch_at(DEFAULTS, &[], day(14, 9)).await.unwrap();
        let second = cache.get_or_fetch_at(DEFAULTS, &[], day(14, 15)).await.unwrap();

        assert_eq!(provider.call_count(), 1);
        assert_eq!(first, second);
        // header + 3 sections + divider
        assert_eq!(first.blocks.len(), 5);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn different_days_get_independent_slots() {
        let provider = Arc::new(MockMenuProvider::new(ok_entries()));
        let cache = MenuCache::new(provider.clone());

        cache.get_or_fetch_at(DEFAULTS, &[], day(14, 9)).await.unwrap();
        cache.get_or_fetch_at(DEFAULTS, &[], day(15, 9)).await.unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn returned_copy_does_not_alias_cache() {
        let provider = Arc::new(MockMenuProvider::new(ok_entries()));
        let cache = MenuCache::new(provider.clone());

        let mut first = cache.get_or_fetch_at(DEFAULTS, &[], day(14, 9)).await.unwrap();
        first.blocks.push(Block::divider());
        first.blocks.remove(0);

        let second = cache.get_or_fetch_at(DEFAULTS, &[], day(14, 10)).await.unwrap();
        assert_eq!(second.blocks.len(), 5);
        assert!(matches!(second.blocks[0], Block::Header { .. }));
    }

    #[tokio::test]
    async fn partial_failure_is_never_cached() {
        let mut entries = ok_entries();
        entries[1] = MenuEntry::failed(Restaurant::Talli, "timeout");
        let provider = Arc::new(MockMenuProvider::new(entries));
        let cache = MenuCache::new(provider.clone());

        let first = cache.get_or_fetch_at(DEFAULTS, &[], day(14, 9)).await.unwrap();
        assert!(first.has_errors());
        cache.get_or_fetch_at(DEFAULTS, &[], day(14, 9)).await.unwrap();

        assert_eq!(provider.call_count(), 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn total_failure_propagates() {
        let provider = Arc::new(MockMenuProvider::failing("menu API down"));
        let cache = MenuCache::new(provider);
        let result = cache.get_or_fetch_at(DEFAULTS, &[], day(14, 9)).await;
        assert!(matches!(result, Err(LounasError::Provider { .. })));
    }

    #[tokio::test]
    async fn clear_forces_refetch() {
        let provider = Arc::new(MockMenuProvider::new(ok_entries()));
        let cache = MenuCache::new(provider.clone());

        cache.get_or_fetch_at(DEFAULTS, &[], day(14, 9)).await.unwrap();
        cache.clear().await;
        assert!(cache.is_empty().await);
        cache.get_or_fetch_at(DEFAULTS, &[], day(14, 9)).await.unwrap();

        assert_eq!(provider.call_count(), 2);
    }
}
