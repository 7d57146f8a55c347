// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text commands recognised in channel messages.

use std::sync::LazyLock;

use regex::Regex;

static MENU_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!(?:lounas|ruokaa)").unwrap());

const CLEAR_CACHE_COMMAND: &str = "!clearCache";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `!lounas` or `!ruokaa`: post today's menus.
    Menu,
    /// `!clearCache`: drop every cached menu.
    ClearCache,
}

impl Command {
    /// The command in `text`, if any. Commands may appear anywhere in the message.
    pub fn parse(text: &str) -> Option<Self> {
        if text.contains(CLEAR_CACHE_COMMAND) {
            Some(Command::ClearCache)
        } else if MENU_COMMAND.is_match(text) {
            Some(Command::Menu)
        } else {
            None
        }
    }
}
