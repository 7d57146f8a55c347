// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock menu provider for deterministic testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use lounas_core::types::{AdapterType, HealthStatus};
use lounas_core::{LounasError, MenuEntry, MenuProvider, PluginAdapter, Restaurant};

/// Returns the same entries on every call, or always fails.
///
/// Only entries for the requested restaurants are returned, and entries for
/// `additional` restaurants come back marked as additional, the way the
/// HTTP provider does it.
pub struct MockMenuProvider {
    entries: Vec<MenuEntry>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MockMenuProvider {
    pub fn new(entries: Vec<MenuEntry>) -> Self {
        Self {
            entries,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A provider whose every fetch fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            failure: Some(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `get_data` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PluginAdapter for MockMenuProvider {
    fn name(&self) -> &str {
        "mock-menu"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, LounasError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl MenuProvider for MockMenuProvider {
    fn base_url(&self) -> &str {
        "http://mock.invalid/menus"
    }

    async fn get_data(
        &self,
        restaurants: &[Restaurant],
        additional: &[Restaurant],
    ) -> Result<Vec<MenuEntry>, LounasError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(LounasError::provider(message.clone()));
        }

        let pick = |r: &Restaurant| self.entries.iter().find(|e| e.restaurant == *r).cloned();
        let mut out: Vec<MenuEntry> = restaurants.iter().filter_map(pick).collect();
        out.extend(additional.iter().filter_map(pick).map(MenuEntry::additional));
        Ok(out)
    }
}
