// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./lounasbot.toml` > `~/.config/lounasbot/lounasbot.toml`
//! > `/etc/lounasbot/lounasbot.toml` with environment variable overrides via
//! the `LOUNAS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::LounasConfig;

/// Config file name looked up in every directory of the hierarchy.
pub const CONFIG_FILE_NAME: &str = "lounasbot.toml";

/// System-wide config path.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/lounasbot/lounasbot.toml";

/// Sections whose env keys are rewritten from `section_key` to `section.key`.
const ENV_SECTIONS: &[&str] = &[
    "bot",
    "slack",
    "provider",
    "storage",
    "debug",
    "prefetch",
    "truncation",
    "keepalive",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/lounasbot/lounasbot.toml` (system-wide)
/// 3. `~/.config/lounasbot/lounasbot.toml` (user XDG config)
/// 4. `./lounasbot.toml` (local directory)
/// 5. `LOUNAS_*` environment variables
pub fn load_config() -> Result<LounasConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<LounasConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LounasConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LounasConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LounasConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LounasConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("lounasbot").join(CONFIG_FILE_NAME))
                .unwrap_or_default(),
        ))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// Map an env key (prefix stripped, lowercased) to its dotted config path.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `slack_bot_token` maps to `slack.bot_token` and not `slack.bot.token`.
pub fn map_env_key(key: &str) -> String {
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

/// `LOUNAS_*` variables as a figment provider.
///
/// Figment hands `map` the key in its original case, so it is lowercased
/// before the section lookup.
pub fn env_provider() -> Env {
    Env::prefixed("LOUNAS_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}
