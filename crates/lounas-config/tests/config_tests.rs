// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for lounasbot configuration loading.

use lounas_config::diagnostic::ConfigError;
use lounas_config::model::LounasConfig;
use lounas_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};
use lounas_core::Restaurant;

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[bot]
name = "lunchbot"
log_level = "debug"
restaurants = ["savo", "talli"]
additional_restaurants = ["holvi", "vino"]
display_voters = true

[slack]
bot_token = "xoxb-123"
signing_secret = "shh"
port = 8080

[provider]
base_url = "http://menus.internal/api"
timeout_secs = 5

[storage]
database_path = "/tmp/lounas.db"
wal_mode = false

[debug]
no_db = true

[prefetch]
schedule = "0 11 * * 1-5"
timezone = "Europe/Stockholm"

[truncation]
enabled = false

[keepalive]
url = "https://lounasbot.example.com/health"
interval_secs = 300
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.name, "lunchbot");
    assert_eq!(
        config.bot.restaurants,
        vec![Restaurant::Savo, Restaurant::Talli]
    );
    assert_eq!(
        config.bot.additional_restaurants,
        vec![Restaurant::Holvi, Restaurant::Vino]
    );
    assert!(config.bot.display_voters);
    assert_eq!(config.slack.bot_token.as_deref(), Some("xoxb-123"));
    assert_eq!(config.slack.port, 8080);
    assert_eq!(config.slack.bind_address, "0.0.0.0");
    assert_eq!(config.provider.timeout_secs, 5);
    assert!(!config.storage.wal_mode);
    assert!(config.debug.no_db);
    assert_eq!(config.prefetch.timezone, "Europe/Stockholm");
    assert!(!config.truncation.enabled);
    assert_eq!(config.truncation.delay_secs, 21600);
    assert_eq!(config.keepalive.interval_secs, 300);
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty config is valid");
    assert_eq!(config.bot.restaurants.len(), 4);
    assert!(config.bot.additional_restaurants.is_empty());
    assert!(!config.bot.display_voters);
    assert!(config.slack.bot_token.is_none());
    assert_eq!(config.slack.port, 3000);
    assert_eq!(config.slack.api_base_url, "https://slack.com/api");
    assert!(!config.debug.no_db);
    assert_eq!(config.prefetch.schedule, "30 10 * * 1-5");
    assert_eq!(config.prefetch.timezone, "Europe/Helsinki");
    assert!(config.keepalive.url.is_none());
}

#[test]
fn unknown_restaurant_is_rejected() {
    let toml = r#"
[bot]
restaurants = ["savo", "mcdonalds"]
"#;
    assert!(load_config_from_str(toml).is_err());
}

#[test]
fn unknown_key_suggests_correction() {
    let toml = r#"
[slack]
bot_tokn = "xoxb"
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown key must fail");
    let found = errors.iter().any(|e| {
        matches!(
            e,
            ConfigError::UnknownKey { key, suggestion: Some(s), valid_keys, .. }
                if key == "bot_tokn" && s == "bot_token" && valid_keys.contains("signing_secret")
        )
    });
    assert!(found, "expected a suggestion for bot_tokn, got {errors:?}");
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let toml = r#"
[telegram]
bot_token = "x"
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown section must fail");
    assert!(matches!(&errors[0], ConfigError::UnknownKey { key, .. } if key == "telegram"));
}

#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[slack]
port = "eighty"
"#;
    let errors = load_and_validate_str(toml).expect_err("wrong type must fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("port"))),
        "got {errors:?}"
    );
}

#[test]
fn validation_errors_surface_through_loader() {
    let toml = r#"
[bot]
restaurants = []

[truncation]
delay_secs = 0
"#;
    let errors = load_and_validate_str(toml).expect_err("invalid values must fail");
    assert_eq!(errors.len(), 2);
}

#[test]
fn dotted_override_sets_section_key() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    // Equivalent of LOUNAS_SLACK_BOT_TOKEN after key mapping.
    let config: LounasConfig = Figment::new()
        .merge(Serialized::defaults(LounasConfig::default()))
        .merge(Toml::string("[slack]\nbot_token = \"from-file\"\n"))
        .merge(("slack.bot_token", "from-env"))
        .merge(("debug.no_db", true))
        .extract()
        .expect("override should merge");

    assert_eq!(config.slack.bot_token.as_deref(), Some("from-env"));
    assert!(config.debug.no_db);
}

#[test]
fn explicit_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lounasbot.toml");
    std::fs::write(&path, "[bot]\ndisplay_voters = true\n").unwrap();

    let config = load_and_validate_path(&path).expect("file config is valid");
    assert!(config.bot.display_voters);
}

#[test]
fn explicit_file_errors_suggest_correction() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lounasbot.toml");
    std::fs::write(&path, "[bot]\ndisplay_votres = true\n").unwrap();

    let errors = load_and_validate_path(&path).expect_err("typo must fail");
    assert!(matches!(
        &errors[0],
        ConfigError::UnknownKey { key, suggestion: Some(s), .. }
            if key == "display_votres" && s == "display_voters"
    ));
}

#[test]
fn config_errors_render_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let errors = load_and_validate_str("[bot]\nnaem = \"x\"\n").unwrap_err();
    let diagnostic: &dyn Diagnostic = &errors[0];
    assert!(diagnostic.code().is_some());
    let help = diagnostic.help().map(|h| h.to_string()).unwrap_or_default();
    assert!(help.contains("did you mean `name`"), "got: {help}");

    let mut out = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut out, diagnostic)
        .unwrap();
    assert!(out.contains("naem"));
}

#[test]
fn environment_variables_override_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "lounasbot.toml",
            "[bot]\ndisplay_voters = false\n\n[slack]\nbot_token = \"from-file\"\n",
        )?;
        jail.set_env("LOUNAS_BOT_DISPLAY_VOTERS", "true");
        jail.set_env("LOUNAS_SLACK_BOT_TOKEN", "xoxb-from-env");
        jail.set_env("LOUNAS_SLACK_SIGNING_SECRET", "env-secret");
        jail.set_env("LOUNAS_KEEPALIVE_INTERVAL_SECS", "120");

        let config = load_and_validate_path(std::path::Path::new("lounasbot.toml"))
            .expect("env overrides are valid keys");
        assert!(config.bot.display_voters);
        assert_eq!(config.slack.bot_token.as_deref(), Some("xoxb-from-env"));
        assert_eq!(config.slack.signing_secret.as_deref(), Some("env-secret"));
        assert_eq!(config.keepalive.interval_secs, 120);
        Ok(())
    });
}

#[test]
fn env_provider_yields_dotted_section_keys() {
    use figment::Figment;

    figment::Jail::expect_with(|jail| {
        jail.set_env("LOUNAS_DEBUG_NO_DB", "true");

        let figment = Figment::from(lounas_config::loader::env_provider());
        let no_db: bool = figment.extract_inner("debug.no_db")?;
        assert!(no_db);
        assert!(figment.find_value("debug_no_db").is_err());
        Ok(())
    });
}
