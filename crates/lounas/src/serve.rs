// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lounas serve` command implementation.
//!
//! Wires the menu provider, the vote store and the Slack client into the
//! bot, starts the background jobs (prefetch, keep-alive) and serves the
//! Slack endpoint until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use lounas_bot::prefetch::run_prefetch_loop;
use lounas_bot::shutdown;
use lounas_bot::{BotSettings, LounasBot, MemoryVoteStore, PrefetchSchedule, TruncationScheduler};
use lounas_config::model::LounasConfig;
use lounas_config::validation::validate_serve;
use lounas_core::{LounasError, PluginAdapter, VoteStore};
use lounas_provider::HttpMenuProvider;
use lounas_slack::{ServerConfig, SigningSecret, SlackChat, SlackState};
use lounas_storage::SqliteVoteStore;

/// Runs the `lounas serve` command.
pub async fn run_serve(config: LounasConfig) -> Result<(), LounasError> {
    init_tracing(&config.bot.log_level);

    if let Err(errors) = validate_serve(&config) {
        lounas_config::render_errors(&errors);
        return Err(LounasError::Config(
            "slack credentials are required to serve".into(),
        ));
    }

    info!(version = env!("CARGO_PKG_VERSION"), "starting lounasbot");

    let cancel = shutdown::install_signal_handler();

    let store = open_store(&config).await;
    let provider = Arc::new(HttpMenuProvider::new(&config.provider)?);
    let chat = Arc::new(SlackChat::new(&config.slack)?);

    match chat.health_check().await? {
        lounas_core::HealthStatus::Healthy => info!("slack credentials accepted"),
        status => warn!(?status, "slack auth check failed, continuing"),
    }

    let settings = BotSettings::from_config(&config.bot, env!("CARGO_PKG_VERSION"));
    let mut bot = LounasBot::new(settings, provider, store.clone(), chat.clone());

    if config.truncation.enabled {
        let delay = Duration::from_secs(config.truncation.delay_secs);
        bot = bot.with_truncation(TruncationScheduler::new(chat.clone(), delay, cancel.clone()));
        info!(delay_secs = config.truncation.delay_secs, "message removal enabled");
    } else {
        debug!("message removal disabled by configuration");
    }

    let schedule = if config.prefetch.enabled {
        let schedule = Arc::new(PrefetchSchedule::new(
            &config.prefetch.schedule,
            &config.prefetch.timezone,
        )?);
        bot = bot.with_prefetch_schedule(schedule.clone());
        Some(schedule)
    } else {
        debug!("prefetch disabled by configuration");
        None
    };

    let bot = Arc::new(bot);

    if let Some(schedule) = schedule {
        info!(
            schedule = config.prefetch.schedule.as_str(),
            timezone = config.prefetch.timezone.as_str(),
            "prefetch scheduled"
        );
        tokio::spawn(run_prefetch_loop(bot.clone(), schedule, cancel.clone()));
    }

    if let Some(url) = config.keepalive.url.clone() {
        let interval = Duration::from_secs(config.keepalive.interval_secs);
        info!(url = url.as_str(), interval_secs = config.keepalive.interval_secs, "keep-alive ping enabled");
        tokio::spawn(run_keepalive(url, interval, cancel.clone()));
    }

    let secret = SigningSecret::new(config.slack.signing_secret.clone().unwrap_or_default());
    let server = ServerConfig {
        host: config.slack.bind_address.clone(),
        port: config.slack.port,
    };
    let served = lounas_slack::start_server(&server, SlackState { bot, secret }, cancel.clone()).await;

    // Stop timers and background jobs even if the server failed.
    cancel.cancel();
    if let Err(e) = store.shutdown().await {
        warn!(error = %e, "vote store shutdown failed");
    }

    served?;
    info!("lounasbot shutdown complete");
    Ok(())
}

/// The durable store, or the in-memory store when it is disabled or
/// cannot be opened.
async fn open_store(config: &LounasConfig) -> Arc<dyn VoteStore> {
    if config.debug.no_db {
        info!("durable vote store disabled, votes are kept in memory");
        return Arc::new(MemoryVoteStore::new());
    }

    let store = SqliteVoteStore::new(config.storage.clone());
    match store.initialize().await {
        Ok(()) => {
            info!(path = config.storage.database_path.as_str(), "vote store opened");
            Arc::new(store)
        }
        Err(e) => {
            error!(
                path = config.storage.database_path.as_str(),
                error = %e,
                "failed to open vote store, votes are kept in memory"
            );
            Arc::new(MemoryVoteStore::new())
        }
    }
}

/// GET `url` every `interval` until cancelled.
async fn run_keepalive(url: String, interval: Duration, cancel: CancellationToken) {
    let client = reqwest::Client::new();
    let mut ticker = tokio::time::interval(interval);
    // Skip the first immediate tick.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match client.get(&url).send().await {
                    Ok(response) => debug!(status = %response.status(), "keep-alive ping"),
                    Err(e) => warn!(error = %e, "keep-alive ping failed"),
                }
            }
            _ = cancel.cancelled() => {
                debug!("keep-alive task shutting down");
                break;
            }
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("lounas={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
