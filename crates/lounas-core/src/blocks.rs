// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Block Kit render tree.
//!
//! Only the block and element types the bot itself renders are modelled.
//! The serde representation matches the platform's JSON so blocks read
//! back from an interaction payload deserialize into the same tree.

use serde::{Deserialize, Serialize};

/// Text formatting mode of a [`TextObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    PlainText,
    Mrkdwn,
}

/// A text composition object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextObject {
    #[serde(rename = "type")]
    pub kind: TextKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbatim: Option<bool>,
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::PlainText,
            text: text.into(),
            emoji: None,
            verbatim: None,
        }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::Mrkdwn,
            text: text.into(),
            emoji: None,
            verbatim: None,
        }
    }
}

/// A button element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub text: TextObject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Button {
    pub fn new(label: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            text: TextObject::plain(label),
            action_id: Some(action_id.into()),
            value: None,
            url: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Interactive elements usable as a section accessory or in an actions block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Button(Button),
}

impl Element {
    pub fn as_button(&self) -> Option<&Button> {
        match self {
            Element::Button(b) => Some(b),
        }
    }

    pub fn as_button_mut(&mut self) -> Option<&mut Button> {
        match self {
            Element::Button(b) => Some(b),
        }
    }
}

/// A layout block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
    },
    Section {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<TextObject>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accessory: Option<Element>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
    },
    Divider {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
    },
    Actions {
        elements: Vec<Element>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
    },
    Context {
        elements: Vec<TextObject>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        block_id: Option<String>,
    },
}

impl Block {
    pub fn header(text: impl Into<String>) -> Self {
        Block::Header {
            text: TextObject::plain(text),
            block_id: None,
        }
    }

    pub fn section(text: TextObject) -> Self {
        Block::Section {
            text: Some(text),
            accessory: None,
            block_id: None,
        }
    }

    pub fn section_with_button(text: TextObject, button: Button) -> Self {
        Block::Section {
            text: Some(text),
            accessory: Some(Element::Button(button)),
            block_id: None,
        }
    }

    pub fn divider() -> Self {
        Block::Divider { block_id: None }
    }

    pub fn actions(buttons: Vec<Button>) -> Self {
        Block::Actions {
            elements: buttons.into_iter().map(Element::Button).collect(),
            block_id: None,
        }
    }

    pub fn context(text: TextObject) -> Self {
        Block::Context {
            elements: vec![text],
            block_id: None,
        }
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, Block::Divider { .. })
    }

    /// Value of the button accessory, if this is a section with one.
    pub fn accessory_value(&self) -> Option<&str> {
        match self {
            Block::Section {
                accessory: Some(element),
                ..
            } => element.as_button().and_then(|b| b.value.as_deref()),
            _ => None,
        }
    }
}
