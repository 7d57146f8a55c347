// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for lounasbot.
//!
//! This crate provides the domain types, the Block Kit render tree, the
//! error type and the adapter traits implemented by the provider, storage
//! and chat crates.

pub mod blocks;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use blocks::{Block, Button, Element, TextKind, TextObject};
pub use error::LounasError;
pub use types::{
    AdapterType, HealthStatus, MenuEntry, MessageEntry, MessageRef, Restaurant, VoteRecord,
};

pub use traits::{ChatAdapter, MenuProvider, PluginAdapter, VoteStore};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn vote_action_round_trips_for_every_restaurant() {
        for restaurant in Restaurant::iter() {
            let action = restaurant.vote_action();
            assert!(action.starts_with(types::VOTE_ACTION_PREFIX));
            assert_eq!(Restaurant::from_vote_action(&action), Some(restaurant));
        }
    }

    #[test]
    fn unknown_vote_action_has_unknown_display_name() {
        assert_eq!(types::vote_action_display_name("upvote-savo"), "Ravintola Savo");
        assert_eq!(types::vote_action_display_name("upvote-nowhere"), "unknown");
        assert_eq!(types::vote_action_display_name("savo"), "unknown");
    }

    #[test]
    fn restaurant_identifiers_are_lowercase() {
        assert_eq!(Restaurant::Savo.to_string(), "savo");
        assert_eq!("august".parse::<Restaurant>().unwrap(), Restaurant::August);
        let json = serde_json::to_string(&Restaurant::Talli).unwrap();
        assert_eq!(json, "\"talli\"");
    }

    #[test]
    fn message_entry_detects_existing_vote() {
        let entry = MessageEntry {
            ts: "100".into(),
            channel: "C1".into(),
            menu: vec![],
            date: chrono::Utc::now(),
            votes: vec![VoteRecord::new("U1", "upvote-savo")],
        };
        assert!(entry.has_vote("U1", "upvote-savo"));
        assert!(!entry.has_vote("U1", "upvote-talli"));
        assert!(!entry.has_vote("U2", "upvote-savo"));
    }

    #[test]
    fn error_display_includes_context() {
        let err = LounasError::MalformedMessage("no divider".into());
        assert_eq!(err.to_string(), "malformed message: no divider");
        let err = LounasError::storage("disk full");
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn all_adapter_traits_are_exported() {
        fn _assert_chat<T: ChatAdapter>() {}
        fn _assert_provider<T: MenuProvider>() {}
        fn _assert_store<T: VoteStore>() {}
        fn _assert_plugin<T: PluginAdapter>() {}
    }
}
