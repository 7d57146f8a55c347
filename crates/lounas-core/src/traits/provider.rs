// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Menu data provider trait.

use async_trait::async_trait;

use crate::error::LounasError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{MenuEntry, Restaurant};

/// Fetches raw menu data for a list of restaurants.
///
/// A provider may fail entirely (`Err`), or succeed with some entries
/// carrying an `error` field. Callers treat the latter as "fetched but
/// not cacheable".
#[async_trait]
pub trait MenuProvider: PluginAdapter {
    /// Base URL of the upstream source, shown in diagnostics.
    fn base_url(&self) -> &str;

    /// Fetches today's menus. Entries for `additional` restaurants are
    /// returned with `is_additional` set.
    async fn get_data(
        &self,
        restaurants: &[Restaurant],
        additional: &[Restaurant],
    ) -> Result<Vec<MenuEntry>, LounasError>;
}
