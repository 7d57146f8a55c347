// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Building menu messages and rewriting them as votes come in.
//!
//! A menu message has the layout
//!
//! ```text
//! header
//! section (one per restaurant, upvote button as accessory)
//! divider
//! [prompt section, actions (one button per additional restaurant), divider]
//! [context]
//! ```
//!
//! Vote counts are recomputed from stored [`VoteRecord`]s whenever a record
//! exists. Only the legacy path reads the current count back from a label.

use std::time::Duration;

use tracing::warn;

use lounas_core::types::{vote_action_display_name, HomeView};
use lounas_core::{Block, Button, Element, LounasError, MenuEntry, Restaurant, TextObject, VoteRecord};

/// `action_id` of every upvote button.
pub const UPVOTE_ACTION_ID: &str = "upvoteButtonAction";

/// `action_id` prefix of the buttons that reveal an additional restaurant.
pub const FETCH_ADDITIONAL_PREFIX: &str = "fetchAdditionalRestaurant-";

/// `action_id` of the project link on the home tab.
pub const LINK_ACTION_ID: &str = "githubButtonLinkAction";

/// Fallback text of a message whose content was removed.
pub const TRUNCATED_TEXT: &str = "_Message removed_";

const VOTE_ICON: &str = ":thumbsup:";
const HEADER_TEXT: &str = "Lunch menus";
const ADDITIONAL_PROMPT: &str = "*Something completely different? Click to fetch*";

/// Header text, with the published date of the first entry that carries one.
pub fn header_text(entries: &[MenuEntry]) -> String {
    match entries.iter().find_map(|e| e.date.as_deref()) {
        Some(date) => format!("{HEADER_TEXT} ({date})"),
        None => HEADER_TEXT.to_string(),
    }
}

/// Render the cacheable part of a menu message: header, one section per
/// regular entry, divider, and the additional restaurant picker.
pub fn build_menu(entries: &[MenuEntry], additional: &[Restaurant]) -> Vec<Block> {
    let mut blocks = vec![Block::header(header_text(entries))];
    blocks.extend(
        entries
            .iter()
            .filter(|e| !e.is_additional)
            .map(menu_section),
    );
    blocks.push(Block::divider());

    if !additional.is_empty() {
        blocks.push(Block::section(TextObject::mrkdwn(ADDITIONAL_PROMPT)));
        blocks.push(Block::actions(
            additional
                .iter()
                .map(|r| {
                    Button::new(r.display_name(), format!("{FETCH_ADDITIONAL_PREFIX}{r}"))
                        .with_value(r.to_string())
                })
                .collect(),
        ));
        blocks.push(Block::divider());
    }
    blocks
}

/// One restaurant's section with its upvote button.
pub fn menu_section(entry: &MenuEntry) -> Block {
    let mut text = format!("*{}*", entry.restaurant.display_name());
    match (&entry.items, &entry.error) {
        (_, Some(error)) => text.push_str(&format!("\n:warning: {error}")),
        (Some(items), None) if !items.is_empty() => {
            for item in items {
                text.push_str(&format!("\n  • {item}"));
            }
        }
        _ => text.push_str("\n_No menu available today_"),
    }

    Block::section_with_button(
        TextObject::mrkdwn(text),
        Button::new(VOTE_ICON, UPVOTE_ACTION_ID).with_value(entry.restaurant.vote_action()),
    )
}

/// Footer appended to a posted menu.
pub fn request_context(requester: Option<&str>, removed_after: Option<Duration>) -> Block {
    let mut lines = Vec::new();
    if let Some(after) = removed_after {
        lines.push(format!(
            ":alarm_clock: This message will be removed automatically in {}",
            human_duration(after)
        ));
    }
    if let Some(user) = requester {
        lines.push(format!(":robot_face: Requested by <@{user}>"));
    }
    Block::context(TextObject::mrkdwn(lines.join("\n")))
}

fn human_duration(d: Duration) -> String {
    let secs = d.as_secs();
    match secs {
        s if s >= 3600 && s % 3600 == 0 => plural(s / 3600, "hour"),
        s if s >= 60 && s % 60 == 0 => plural(s / 60, "minute"),
        s => plural(s, "second"),
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Button label for a vote count. Zero votes shows the bare icon.
pub fn vote_label(count: usize) -> String {
    if count == 0 {
        VOTE_ICON.to_string()
    } else {
        format!("{VOTE_ICON} {count}")
    }
}

/// Recover the count from a label produced by [`vote_label`].
///
/// Anything unparseable counts as zero.
pub fn parse_vote_count(label: &str) -> usize {
    label
        .split_whitespace()
        .nth(1)
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

fn mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

fn is_voter_line(line: &str) -> bool {
    line.contains("<@")
}

/// Durable path: recompute every upvote button from the full vote list.
///
/// With `display_voters`, the second line of each section's text becomes
/// the mentions of that action's voters, each listed once.
pub fn apply_tallies(blocks: &mut [Block], votes: &[VoteRecord], display_voters: bool) {
    for block in blocks.iter_mut() {
        let Block::Section {
            text,
            accessory: Some(Element::Button(button)),
            ..
        } = block
        else {
            continue;
        };
        let Some(action) = button.value.clone() else {
            continue;
        };

        let mut voters: Vec<&str> = Vec::new();
        let mut count = 0;
        for vote in votes.iter().filter(|v| v.action == action) {
            count += 1;
            if !voters.contains(&vote.user_id.as_str()) {
                voters.push(&vote.user_id);
            }
        }
        button.text.text = vote_label(count);

        if display_voters {
            match text {
                Some(text) => {
                    let line = voters.iter().map(|u| mention(u)).collect::<Vec<_>>().join(" ");
                    text.text = replace_voter_line(&text.text, &line);
                }
                None => warn!(%action, "section without text, voter line not updated"),
            }
        }
    }
}

fn replace_voter_line(text: &str, voters: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let has_line = lines.get(1).is_some_and(|l| is_voter_line(l));
    match (has_line, voters.is_empty()) {
        (true, false) => lines[1] = voters,
        (true, true) => {
            lines.remove(1);
        }
        (false, false) => lines.insert(1.min(lines.len()), voters),
        (false, true) => {}
    }
    lines.join("\n")
}

/// Legacy path: bump the count on the voted button by one, reading the
/// previous count from its label.
pub fn apply_single_vote(
    blocks: &mut [Block],
    action: &str,
    user_id: &str,
    display_voters: bool,
) -> Result<(), LounasError> {
    let (text, button) = blocks
        .iter_mut()
        .find_map(|block| match block {
            Block::Section {
                text,
                accessory: Some(Element::Button(button)),
                ..
            } if button.value.as_deref() == Some(action) => Some((text, button)),
            _ => None,
        })
        .ok_or_else(|| {
            LounasError::MalformedMessage(format!("no section with button value `{action}`"))
        })?;

    button.text.text = vote_label(parse_vote_count(&button.text.text) + 1);

    if display_voters {
        match text {
            Some(text) => text.text = append_voter(&text.text, user_id),
            None => warn!(%action, "section without text, voter line not updated"),
        }
    }
    Ok(())
}

fn append_voter(text: &str, user_id: &str) -> String {
    let tag = mention(user_id);
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    match lines.get_mut(1) {
        Some(line) if is_voter_line(line) => {
            if !line.split(' ').any(|t| t == tag) {
                line.push(' ');
                line.push_str(&tag);
            }
        }
        _ => lines.insert(1.min(lines.len()), tag),
    }
    lines.join("\n")
}

/// Reveal an additional restaurant in an already posted message.
///
/// The entry's section goes in front of the first divider and its button is
/// removed from the picker. When the picker runs out of buttons, the prompt,
/// the actions block and the divider after it are dropped as well.
pub fn insert_additional(blocks: &mut Vec<Block>, entry: &MenuEntry) -> Result<(), LounasError> {
    let divider = blocks
        .iter()
        .position(Block::is_divider)
        .filter(|&i| i >= 1)
        .ok_or_else(|| LounasError::MalformedMessage("no divider after the menu".into()))?;

    blocks.insert(divider, menu_section(entry));

    // new section, divider, prompt, actions
    let actions_at = divider + 3;
    let value = entry.restaurant.to_string();
    let remaining = match blocks.get_mut(actions_at) {
        Some(Block::Actions { elements, .. }) => {
            elements.retain(|e| {
                e.as_button()
                    .is_none_or(|b| b.value.as_deref() != Some(value.as_str()))
            });
            elements.len()
        }
        _ => {
            return Err(LounasError::MalformedMessage(
                "no restaurant picker after the menu".into(),
            ));
        }
    };

    if remaining == 0 {
        let end = (divider + 5).min(blocks.len());
        blocks.drain(divider + 2..end);
    }
    Ok(())
}

/// Ephemeral notice for a repeated vote.
pub fn already_voted_text(user_id: &str, action: &str) -> String {
    format!(
        "Hey, <@{user_id}>! You have already voted for {}. You can vote for each option only once.",
        vote_action_display_name(action)
    )
}

/// Facts shown in the home tab's debug footer.
#[derive(Debug, Clone, Default)]
pub struct HomeInfo {
    pub bot_name: String,
    pub version: String,
    pub git_url: String,
    pub provider: Option<(String, String)>,
    pub next_prefetch: Option<String>,
}

/// Content of the home tab for `user_id`.
pub fn home_view(user_id: &str, info: &HomeInfo) -> HomeView {
    let mut debug = Vec::new();
    if let Some((name, url)) = &info.provider {
        debug.push(format!("Data provider: {name} ({url})"));
    }
    if let Some(next) = &info.next_prefetch {
        debug.push(format!("Next data prefetching will occur at {next}"));
    }
    let debug_text = if debug.is_empty() {
        "---".to_string()
    } else {
        format!("Debug information:\n{}", debug.join("\n"))
    };

    HomeView {
        blocks: vec![
            Block::header(format!("{} v{}", info.bot_name, info.version)),
            Block::divider(),
            Block::section(TextObject::mrkdwn(format!(
                "Hello <@{user_id}>, I am {}. Call me with *!lounas* or *!ruokaa* on any \
                 channel I have been invited to and I will fetch today's lunch menus.",
                info.bot_name
            ))),
            Block::section(TextObject::plain(
                "You can also open a direct message with me and use the same commands there.",
            )),
            Block::section_with_button(
                TextObject::mrkdwn("_Help me get better_ -->"),
                Button::new(":link: GitHub", LINK_ACTION_ID).with_url(info.git_url.clone()),
            ),
            Block::context(TextObject::plain(debug_text)),
        ],
    }
}
