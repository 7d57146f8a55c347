// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: configuration, the bot and the SQLite vote store
//! wired together, with mock menu and chat adapters at the edges.
//!
//! Each test uses its own temporary database and is order-insensitive.

use std::path::Path;
use std::sync::Arc;

use lounas_bot::render::UPVOTE_ACTION_ID;
use lounas_bot::{ActionOutcome, BotSettings, LounasBot, MessageOutcome};
use lounas_config::model::StorageConfig;
use lounas_core::types::{ActionResponse, BlockAction, IncomingMessage};
use lounas_core::{Block, Element, MenuEntry, MessageRef, PluginAdapter, Restaurant, VoteStore};
use lounas_storage::SqliteVoteStore;
use lounas_test_utils::{MockChat, MockMenuProvider};
use serial_test::serial;

const CONFIG: &str = r#"
[bot]
restaurants = ["savo", "talli", "rami"]
display_voters = true

[slack]
bot_token = "xoxb-test"
signing_secret = "secret"
"#;

struct Harness {
    bot: LounasBot,
    chat: Arc<MockChat>,
    provider: Arc<MockMenuProvider>,
    store: Arc<SqliteVoteStore>,
}

async fn open_store(dir: &Path) -> Arc<SqliteVoteStore> {
    let store = SqliteVoteStore::new(StorageConfig {
        database_path: dir.join("lounasbot.db").to_string_lossy().into_owned(),
        wal_mode: true,
    });
    store.initialize().await.unwrap();
    Arc::new(store)
}

async fn harness(dir: &Path) -> Harness {
    let config = lounas_config::load_and_validate_str(CONFIG).unwrap();
    let settings = BotSettings::from_config(&config.bot, "0.1.0-test");
    let chat = Arc::new(MockChat::new());
    let provider = Arc::new(MockMenuProvider::new(vec![
        MenuEntry::new(Restaurant::Savo, vec!["Salmon soup".into()]).with_date("ke 14.10."),
        MenuEntry::new(Restaurant::Talli, vec!["Meatballs".into()]),
        MenuEntry::new(Restaurant::Rami, vec!["Falafel".into()]),
    ]));
    let store = open_store(dir).await;
    let bot = LounasBot::new(settings, provider.clone(), store.clone(), chat.clone());
    Harness {
        bot,
        chat,
        provider,
        store,
    }
}

fn command(text: &str) -> IncomingMessage {
    IncomingMessage {
        channel: "C-lunch".into(),
        user: Some("U-requester".into()),
        text: text.into(),
        subtype: None,
    }
}

fn upvote(posted: &MessageRef, blocks: &[Block], user: &str, restaurant: Restaurant) -> BlockAction {
    BlockAction {
        action_id: UPVOTE_ACTION_ID.into(),
        value: Some(restaurant.vote_action()),
        user_id: user.into(),
        user_name: None,
        channel_id: Some(posted.channel.clone()),
        message_ts: Some(posted.ts.clone()),
        blocks: Some(blocks.to_vec()),
        response_url: "https://hooks.invalid/r".into(),
    }
}

fn label(blocks: &[Block], restaurant: Restaurant) -> String {
    let value = restaurant.vote_action();
    blocks
        .iter()
        .find_map(|b| match b {
            Block::Section {
                accessory: Some(Element::Button(button)),
                ..
            } if button.value.as_deref() == Some(value.as_str()) => Some(button.text.text.clone()),
            _ => None,
        })
        .unwrap()
}

async fn current_blocks(h: &Harness) -> Vec<Block> {
    let responses = h.chat.responses().await;
    match responses.iter().rev().find_map(|(_, r)| match r {
        ActionResponse::ReplaceOriginal { blocks } => Some(blocks.clone()),
        ActionResponse::Ephemeral { .. } => None,
    }) {
        Some(blocks) => blocks,
        None => h.chat.posts().await[0].1.blocks.clone(),
    }
}

async fn post(h: &Harness) -> MessageRef {
    match h.bot.handle_message(&command("!lounas")).await {
        MessageOutcome::MenuPosted(posted) => posted,
        other => panic!("menu not posted: {other:?}"),
    }
}

#[tokio::test]
async fn posted_menu_is_recorded_durably() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path()).await;
    let posted = post(&h).await;

    let entry = h.store.find(&posted.ts, &posted.channel).await.unwrap().unwrap();
    assert_eq!(entry.menu.len(), 3);
    assert_eq!(entry.menu[0].restaurant, Restaurant::Savo);
    assert!(entry.votes.is_empty());
}

#[tokio::test]
async fn votes_are_counted_per_distinct_user_and_action() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path()).await;
    let posted = post(&h).await;

    for (user, restaurant) in [
        ("U1", Restaurant::Savo),
        ("U2", Restaurant::Savo),
        ("U1", Restaurant::Talli),
        ("U3", Restaurant::Savo),
    ] {
        let blocks = current_blocks(&h).await;
        let outcome = h.bot.handle_action(&upvote(&posted, &blocks, user, restaurant)).await;
        assert_eq!(outcome, ActionOutcome::VoteAccepted);
    }

    let blocks = current_blocks(&h).await;
    assert_eq!(label(&blocks, Restaurant::Savo), ":thumbsup: 3");
    assert_eq!(label(&blocks, Restaurant::Talli), ":thumbsup: 1");
    assert_eq!(label(&blocks, Restaurant::Rami), ":thumbsup:");

    let entry = h.store.find(&posted.ts, &posted.channel).await.unwrap().unwrap();
    assert_eq!(entry.votes.len(), 4);
}

#[tokio::test]
async fn duplicate_vote_leaves_stored_tallies_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path()).await;
    let posted = post(&h).await;

    let blocks = current_blocks(&h).await;
    h.bot.handle_action(&upvote(&posted, &blocks, "U1", Restaurant::Rami)).await;
    let before = h.store.find(&posted.ts, &posted.channel).await.unwrap().unwrap();

    let blocks = current_blocks(&h).await;
    let outcome = h.bot.handle_action(&upvote(&posted, &blocks, "U1", Restaurant::Rami)).await;
    assert_eq!(outcome, ActionOutcome::AlreadyVoted);

    let after = h.store.find(&posted.ts, &posted.channel).await.unwrap().unwrap();
    assert_eq!(before.votes, after.votes);
    assert_eq!(label(&current_blocks(&h).await, Restaurant::Rami), ":thumbsup: 1");
}

#[tokio::test]
async fn voter_line_lists_each_voter_once() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path()).await;
    let posted = post(&h).await;

    for user in ["U1", "U2"] {
        let blocks = current_blocks(&h).await;
        h.bot.handle_action(&upvote(&posted, &blocks, user, Restaurant::Savo)).await;
    }

    let blocks = current_blocks(&h).await;
    let text = blocks
        .iter()
        .find_map(|b| match b {
            Block::Section {
                text: Some(text),
                accessory: Some(_),
                ..
            } if b.accessory_value() == Some("upvote-savo") => Some(text.text.clone()),
            _ => None,
        })
        .unwrap();
    let lines: Vec<&str> = text.split('\n').collect();
    assert_eq!(lines[0], "*Ravintola Savo*");
    assert_eq!(lines[1], "<@U1> <@U2>");
    assert!(lines[2].contains("Salmon soup"));
}

#[tokio::test]
async fn votes_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let posted;
    let blocks;
    {
        let h = harness(dir.path()).await;
        posted = post(&h).await;
        let first = current_blocks(&h).await;
        h.bot.handle_action(&upvote(&posted, &first, "U1", Restaurant::Talli)).await;
        blocks = current_blocks(&h).await;
        h.store.shutdown().await.unwrap();
    }

    let h = harness(dir.path()).await;
    let outcome = h.bot.handle_action(&upvote(&posted, &blocks, "U1", Restaurant::Talli)).await;
    assert_eq!(outcome, ActionOutcome::AlreadyVoted);

    let outcome = h.bot.handle_action(&upvote(&posted, &blocks, "U2", Restaurant::Talli)).await;
    assert_eq!(outcome, ActionOutcome::VoteAccepted);
    assert_eq!(label(&current_blocks(&h).await, Restaurant::Talli), ":thumbsup: 2");
}

#[tokio::test]
async fn clear_cache_forces_real_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let h = harness(dir.path()).await;

    post(&h).await;
    post(&h).await;
    assert_eq!(h.provider.call_count(), 1);

    h.bot.handle_message(&command("please !clearCache")).await;
    post(&h).await;
    assert_eq!(h.provider.call_count(), 2);
}

#[test]
#[serial]
fn environment_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lounasbot.toml");
    std::fs::write(&path, CONFIG).unwrap();

    // SAFETY: serialized with every other test that touches the environment.
    unsafe { std::env::set_var("LOUNAS_BOT_DISPLAY_VOTERS", "false") };
    let config = lounas_config::load_and_validate_path(&path);
    unsafe { std::env::remove_var("LOUNAS_BOT_DISPLAY_VOTERS") };

    let config = config.unwrap();
    assert!(!config.bot.display_voters);
    assert_eq!(config.bot.restaurants.len(), 3);
}

#[test]
#[serial]
fn invalid_file_is_reported_not_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lounasbot.toml");
    std::fs::write(&path, "[bot]\nrestaurants = []\n").unwrap();

    let errors = lounas_config::load_and_validate_path(&path).unwrap_err();
    assert!(!errors.is_empty());
}
