// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks run after deserialization.
//!
//! All problems are collected so a single run reports every mistake.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::LounasConfig;

/// Validate a deserialized configuration.
pub fn validate_config(config: &LounasConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    validate_restaurants(config, &mut errors);

    let addr = config.slack.bind_address.trim();
    if addr.is_empty() {
        errors.push(ConfigError::validation("slack.bind_address must not be empty"));
    } else if addr.parse::<std::net::IpAddr>().is_err()
        && !addr
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        errors.push(ConfigError::validation(format!(
            "slack.bind_address `{addr}` is not a valid IP address or hostname"
        )));
    }

    if config.slack.port == 0 {
        errors.push(ConfigError::validation("slack.port must not be 0"));
    }

    if !config.debug.no_db && config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty unless debug.no_db is set",
        ));
    }

    if config.provider.base_url.trim().is_empty() {
        errors.push(ConfigError::validation("provider.base_url must not be empty"));
    }
    if config.provider.timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "provider.timeout_secs must be at least 1",
        ));
    }

    if config.prefetch.enabled {
        if let Err(e) = config.prefetch.schedule.parse::<croner::Cron>() {
            errors.push(ConfigError::validation(format!(
                "prefetch.schedule `{}` is not a valid cron expression: {e}",
                config.prefetch.schedule
            )));
        }
        if config.prefetch.timezone.parse::<chrono_tz::Tz>().is_err() {
            errors.push(ConfigError::validation(format!(
                "prefetch.timezone `{}` is not a known IANA time zone",
                config.prefetch.timezone
            )));
        }
    }

    if config.truncation.enabled && config.truncation.delay_secs == 0 {
        errors.push(ConfigError::validation(
            "truncation.delay_secs must be at least 1",
        ));
    }

    if config.keepalive.url.is_some() && config.keepalive.interval_secs == 0 {
        errors.push(ConfigError::validation(
            "keepalive.interval_secs must be at least 1",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Credentials are optional for `check-config` and `prefetch` but required to serve.
pub fn validate_serve(config: &LounasConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());

    if blank(&config.slack.bot_token) {
        errors.push(ConfigError::MissingKey {
            key: "slack.bot_token".to_string(),
        });
    }
    if blank(&config.slack.signing_secret) {
        errors.push(ConfigError::MissingKey {
            key: "slack.signing_secret".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_restaurants(config: &LounasConfig, errors: &mut Vec<ConfigError>) {
    if config.bot.restaurants.is_empty() {
        errors.push(ConfigError::validation("bot.restaurants must not be empty"));
    }

    let mut seen = HashSet::new();
    for restaurant in &config.bot.restaurants {
        if !seen.insert(*restaurant) {
            errors.push(ConfigError::validation(format!(
                "restaurant `{restaurant}` is listed more than once in bot.restaurants"
            )));
        }
    }

    let mut seen_additional = HashSet::new();
    for restaurant in &config.bot.additional_restaurants {
        if !seen_additional.insert(*restaurant) {
            errors.push(ConfigError::validation(format!(
                "restaurant `{restaurant}` is listed more than once in bot.additional_restaurants"
            )));
        } else if seen.contains(restaurant) {
            errors.push(ConfigError::validation(format!(
                "restaurant `{restaurant}` cannot be both a regular and an additional restaurant"
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use lounas_core::Restaurant;

    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&LounasConfig::default()).is_ok());
    }

    #[test]
    fn empty_restaurant_list_fails() {
        let mut config = LounasConfig::default();
        config.bot.restaurants.clear();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "bot.restaurants must not be empty"));
    }

    #[test]
    fn overlapping_restaurant_lists_fail() {
        let mut config = LounasConfig::default();
        config.bot.additional_restaurants = vec![Restaurant::Holvi, Restaurant::Savo];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(has_message(&errors, "`savo` cannot be both"));
    }

    #[test]
    fn duplicate_restaurant_fails() {
        let mut config = LounasConfig::default();
        config.bot.restaurants.push(Restaurant::Talli);
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "`talli` is listed more than once"));
    }

    #[test]
    fn database_path_may_be_empty_without_db() {
        let mut config = LounasConfig::default();
        config.storage.database_path = String::new();
        assert!(validate_config(&config).is_err());
        config.debug.no_db = true;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bad_schedule_and_timezone_are_both_reported() {
        let mut config = LounasConfig::default();
        config.prefetch.schedule = "every morning".to_string();
        config.prefetch.timezone = "Mars/Olympus".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "prefetch.schedule"));
        assert!(has_message(&errors, "prefetch.timezone"));
    }

    #[test]
    fn disabled_prefetch_skips_schedule_checks() {
        let mut config = LounasConfig::default();
        config.prefetch.enabled = false;
        config.prefetch.schedule = "nonsense".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_truncation_delay_fails() {
        let mut config = LounasConfig::default();
        config.truncation.delay_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "truncation.delay_secs"));
    }

    #[test]
    fn bad_bind_address_fails() {
        let mut config = LounasConfig::default();
        config.slack.bind_address = "not an address!".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "slack.bind_address"));
    }

    #[test]
    fn serve_requires_credentials() {
        let mut config = LounasConfig::default();
        let errors = validate_serve(&config).unwrap_err();
        assert_eq!(errors.len(), 2);

        config.slack.bot_token = Some("xoxb-1".to_string());
        config.slack.signing_secret = Some("secret".to_string());
        assert!(validate_serve(&config).is_ok());

        config.slack.signing_secret = Some("  ".to_string());
        let errors = validate_serve(&config).unwrap_err();
        assert!(matches!(&errors[0], ConfigError::MissingKey { key } if key == "slack.signing_secret"));
    }
}
