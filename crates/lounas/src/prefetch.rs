// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lounas prefetch` command implementation.
//!
//! One fetch through the configured provider, printed instead of posted.

use std::sync::Arc;

use lounas_bot::{CachedMenu, MenuCache};
use lounas_config::LounasConfig;
use lounas_core::LounasError;
use lounas_provider::HttpMenuProvider;

pub async fn run_prefetch(config: &LounasConfig) -> Result<(), LounasError> {
    let provider = Arc::new(HttpMenuProvider::new(&config.provider)?);
    let cache = MenuCache::new(provider);
    let menu = cache
        .get_or_fetch(&config.bot.restaurants, &config.bot.additional_restaurants)
        .await?;
    print!("{}", report(&menu));
    Ok(())
}

fn report(menu: &CachedMenu) -> String {
    let mut out = format!("{}\n", menu.text);
    for entry in &menu.data {
        let marker = if entry.is_additional { " (additional)" } else { "" };
        match (&entry.error, &entry.items) {
            (Some(error), _) => {
                out.push_str(&format!("  {}{marker}: error: {error}\n", entry.restaurant))
            }
            (None, Some(items)) => out.push_str(&format!(
                "  {}{marker}: {} items\n",
                entry.restaurant,
                items.len()
            )),
            (None, None) => out.push_str(&format!("  {}{marker}: no menu\n", entry.restaurant)),
        }
    }
    out.push_str(&format!(
        "{} entries, {} blocks\n",
        menu.data.len(),
        menu.blocks.len()
    ));
    out
}
