// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for lounasbot.
//!
//! Mock adapters for fast, deterministic tests without a network or a
//! Slack workspace.
//!
//! - [`MockMenuProvider`] - canned menu data with a call counter
//! - [`MockChat`] - captures every outbound chat call
//! - [`FailingVoteStore`] - a vote store whose every call fails
//! - [`VoteWriteFailingStore`] - records messages but fails every vote write

pub mod mock_chat;
pub mod mock_provider;
pub mod mock_store;

pub use mock_chat::MockChat;
pub use mock_provider::MockMenuProvider;
pub use mock_store::{FailingVoteStore, VoteWriteFailingStore};
