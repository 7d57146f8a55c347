// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for lounasbot.

use thiserror::Error;

/// The primary error type used across all adapter traits and bot operations.
#[derive(Debug, Error)]
pub enum LounasError {
    /// Configuration errors (invalid values, missing tokens, bad cron expressions).
    #[error("configuration error: {0}")]
    Config(String),

    /// Durable vote store errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Menu data provider errors (network failure, unparseable response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Chat platform errors (HTTP failure, API returned `ok: false`).
    #[error("chat error: {message}")]
    Chat {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An interactive message did not have the structure the bot rendered.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LounasError {
    /// Shorthand for a storage error carrying only a message.
    pub fn storage(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Storage {
            source: message.into(),
        }
    }

    /// Shorthand for a chat error without an underlying source.
    pub fn chat(message: impl Into<String>) -> Self {
        Self::Chat {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }
}
