// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack adapter for lounasbot.
//!
//! The inbound side is an axum endpoint for Events API callbacks and
//! interactivity payloads, each verified against the app's signing secret.
//! The outbound side is [`SlackChat`], a slack-morphism Web API client
//! implementing [`lounas_core::ChatAdapter`]. The bot's render tree is
//! converted to slack-morphism Block Kit blocks on the way out.

pub mod auth;
pub mod blocks;
pub mod client;
pub mod events;
pub mod server;

pub use auth::{SignatureError, SigningSecret};
pub use client::{ResponseUrlClient, SlackChat};
pub use server::{router, start_server, ServerConfig, SlackState};
