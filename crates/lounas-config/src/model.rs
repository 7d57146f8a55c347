// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for lounasbot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use lounas_core::Restaurant;
use serde::{Deserialize, Serialize};

/// Top-level lounasbot configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LounasConfig {
    /// Bot identity, restaurant lists and voting behavior.
    #[serde(default)]
    pub bot: BotConfig,

    /// Slack app credentials and HTTP endpoint settings.
    #[serde(default)]
    pub slack: SlackConfig,

    /// Menu data provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Durable vote store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Debug switches.
    #[serde(default)]
    pub debug: DebugConfig,

    /// Scheduled menu prefetching.
    #[serde(default)]
    pub prefetch: PrefetchConfig,

    /// Automatic removal of posted menus.
    #[serde(default)]
    pub truncation: TruncationConfig,

    /// Periodic self-ping keeping free-tier hosts awake.
    #[serde(default)]
    pub keepalive: KeepaliveConfig,
}

/// Bot identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Restaurants shown in every menu message.
    #[serde(default = "default_restaurants")]
    pub restaurants: Vec<Restaurant>,

    /// Restaurants fetched with the rest but only shown on request.
    #[serde(default)]
    pub additional_restaurants: Vec<Restaurant>,

    /// Show the mentions of voters under each restaurant.
    #[serde(default)]
    pub display_voters: bool,

    /// Project link shown on the home tab.
    #[serde(default = "default_git_url")]
    pub git_url: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
            restaurants: default_restaurants(),
            additional_restaurants: Vec::new(),
            display_voters: false,
            git_url: default_git_url(),
        }
    }
}

fn default_bot_name() -> String {
    "lounasbot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_restaurants() -> Vec<Restaurant> {
    vec![
        Restaurant::Savo,
        Restaurant::Talli,
        Restaurant::Rami,
        Restaurant::August,
    ]
}

fn default_git_url() -> String {
    "https://github.com/lounasbot/lounasbot".to_string()
}

/// Slack app configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SlackConfig {
    /// Bot user OAuth token (`xoxb-...`). Required to serve.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Signing secret used to verify inbound requests. Required to serve.
    #[serde(default)]
    pub signing_secret: Option<String>,

    /// Address the events endpoint binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port the events endpoint listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Web API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            signing_secret: None,
            bind_address: default_bind_address(),
            port: default_port(),
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_api_base_url() -> String {
    "https://slack.com/api".to_string()
}

/// Menu data provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Base URL of the menu API. One `GET {base_url}/{restaurant}` per restaurant.
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,

    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_provider_timeout_secs(),
        }
    }
}

fn default_provider_base_url() -> String {
    "http://127.0.0.1:8090/menus".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; Lounasbot/1.0;)".to_string()
}

fn default_provider_timeout_secs() -> u64 {
    15
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("lounasbot").join("lounasbot.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("lounasbot.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Debug switches.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugConfig {
    /// Disable the durable store. Votes are then kept in memory only.
    #[serde(default)]
    pub no_db: bool,
}

/// Scheduled prefetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrefetchConfig {
    /// Warm the menu cache on a schedule.
    #[serde(default = "default_prefetch_enabled")]
    pub enabled: bool,

    /// Cron expression (minute hour day-of-month month day-of-week).
    #[serde(default = "default_prefetch_schedule")]
    pub schedule: String,

    /// IANA time zone the schedule is evaluated in.
    #[serde(default = "default_prefetch_timezone")]
    pub timezone: String,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            enabled: default_prefetch_enabled(),
            schedule: default_prefetch_schedule(),
            timezone: default_prefetch_timezone(),
        }
    }
}

fn default_prefetch_enabled() -> bool {
    true
}

fn default_prefetch_schedule() -> String {
    "30 10 * * 1-5".to_string() // business days 10:30
}

fn default_prefetch_timezone() -> String {
    "Europe/Helsinki".to_string()
}

/// Automatic removal of posted menu messages.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TruncationConfig {
    /// Replace posted menus with a placeholder after `delay_secs`.
    #[serde(default = "default_truncation_enabled")]
    pub enabled: bool,

    /// Delay before a posted menu is removed.
    #[serde(default = "default_truncation_delay_secs")]
    pub delay_secs: u64,
}

impl Default for TruncationConfig {
    fn default() -> Self {
        Self {
            enabled: default_truncation_enabled(),
            delay_secs: default_truncation_delay_secs(),
        }
    }
}

fn default_truncation_enabled() -> bool {
    true
}

fn default_truncation_delay_secs() -> u64 {
    6 * 60 * 60
}

/// Keep-alive ping configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeepaliveConfig {
    /// URL to ping. `None` disables the ping.
    #[serde(default)]
    pub url: Option<String>,

    /// Seconds between pings.
    #[serde(default = "default_keepalive_interval_secs")]
    pub interval_secs: u64,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            url: None,
            interval_secs: default_keepalive_interval_secs(),
        }
    }
}

fn default_keepalive_interval_secs() -> u64 {
    600
}
