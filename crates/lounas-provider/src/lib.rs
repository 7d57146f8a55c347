// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Menu data provider backed by an HTTP/JSON menu API.
//!
//! One `GET {base_url}/{restaurant}` is issued per restaurant, all in
//! parallel. A failing restaurant becomes an entry with its `error` set; only
//! when every request fails is the whole fetch reported as an error.

pub mod client;
pub mod types;

pub use client::HttpMenuProvider;
