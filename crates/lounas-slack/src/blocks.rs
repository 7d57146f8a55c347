// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of the bot's render tree into slack-morphism Block Kit blocks.

use slack_morphism::prelude::*;
use tracing::warn;
use url::Url;

use lounas_core::{Block, Button, Element, TextKind, TextObject};

/// Convert a whole message.
pub fn to_slack_blocks(blocks: &[Block]) -> Vec<SlackBlock> {
    blocks.iter().map(to_slack_block).collect()
}

pub fn to_slack_block(block: &Block) -> SlackBlock {
    match block {
        Block::Header { text, .. } => SlackHeaderBlock::new(plain_only(text)).into(),
        Block::Section {
            text, accessory, ..
        } => {
            let mut section = SlackSectionBlock::new();
            if let Some(text) = text {
                section = section.with_text(block_text(text));
            }
            if let Some(Element::Button(button)) = accessory {
                section = section.with_accessory(SlackSectionBlockElement::Button(
                    button_element(button),
                ));
            }
            section.into()
        }
        Block::Divider { .. } => SlackDividerBlock::new().into(),
        Block::Actions { elements, .. } => SlackActionsBlock::new(
            elements
                .iter()
                .map(|Element::Button(button)| SlackActionBlockElement::Button(button_element(button)))
                .collect(),
        )
        .into(),
        Block::Context { elements, .. } => {
            SlackContextBlock::new(elements.iter().map(context_element).collect()).into()
        }
    }
}

fn block_text(text: &TextObject) -> SlackBlockText {
    match text.kind {
        TextKind::PlainText => SlackBlockText::Plain(SlackBlockPlainText::new(text.text.clone())),
        TextKind::Mrkdwn => SlackBlockText::MarkDown(SlackBlockMarkDownText::new(text.text.clone())),
    }
}

fn plain_only(text: &TextObject) -> SlackBlockPlainTextOnly {
    SlackBlockPlainText::new(text.text.clone()).into()
}

fn context_element(text: &TextObject) -> SlackContextBlockElement {
    match text.kind {
        TextKind::PlainText => {
            SlackContextBlockElement::Plain(SlackBlockPlainText::new(text.text.clone()))
        }
        TextKind::Mrkdwn => {
            SlackContextBlockElement::MarkDown(SlackBlockMarkDownText::new(text.text.clone()))
        }
    }
}

fn button_element(button: &Button) -> SlackBlockButtonElement {
    let mut element = SlackBlockButtonElement::new(plain_only(&button.text)).with_action_id(
        SlackActionId::new(button.action_id.clone().unwrap_or_default()),
    );
    if let Some(value) = &button.value {
        element = element.with_value(value.clone());
    }
    if let Some(url) = &button.url {
        match Url::parse(url) {
            Ok(url) => element = element.with_url(url),
            Err(e) => warn!(%url, error = %e, "dropping unparseable button url"),
        }
    }
    element
}
