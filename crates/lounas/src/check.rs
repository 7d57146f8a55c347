// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lounas check-config` command implementation.

use lounas_config::LounasConfig;
use lounas_config::validation::validate_serve;

/// Print a summary of a configuration that already passed validation.
///
/// Missing Slack credentials are reported as warnings: the file is valid,
/// but `serve` will refuse to start.
pub fn run_check_config(config: &LounasConfig) {
    print!("{}", summary(config));
    if let Err(errors) = validate_serve(config) {
        for error in &errors {
            println!("  warning: {error}");
        }
    }
}

fn list<T: std::fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn summary(config: &LounasConfig) -> String {
    let mut out = String::new();
    out.push_str("\n  lounasbot configuration OK\n");
    out.push_str(&format!("  {}\n", "-".repeat(50)));
    out.push_str(&format!("  name:          {}\n", config.bot.name));
    out.push_str(&format!("  restaurants:   {}\n", list(&config.bot.restaurants)));
    out.push_str(&format!(
        "  additional:    {}\n",
        list(&config.bot.additional_restaurants)
    ));
    out.push_str(&format!("  show voters:   {}\n", config.bot.display_voters));
    out.push_str(&format!("  provider:      {}\n", config.provider.base_url));
    if config.debug.no_db {
        out.push_str("  votes:         in memory (debug.no_db)\n");
    } else {
        out.push_str(&format!(
            "  votes:         {}\n",
            config.storage.database_path
        ));
    }
    out.push_str(&format!(
        "  listening on:  {}:{}\n",
        config.slack.bind_address, config.slack.port
    ));
    if config.prefetch.enabled {
        out.push_str(&format!(
            "  prefetch:      \"{}\" ({})\n",
            config.prefetch.schedule, config.prefetch.timezone
        ));
    } else {
        out.push_str("  prefetch:      disabled\n");
    }
    if config.truncation.enabled {
        out.push_str(&format!(
            "  removal after: {}s\n",
            config.truncation.delay_secs
        ));
    } else {
        out.push_str("  removal after: disabled\n");
    }
    match &config.keepalive.url {
        Some(url) => out.push_str(&format!(
            "  keep-alive:    {url} every {}s\n",
            config.keepalive.interval_secs
        )),
        None => out.push_str("  keep-alive:    disabled\n"),
    }
    out
}
