// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types of the menu API.

use serde::Deserialize;

/// Body of `GET {base_url}/{restaurant}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuResponse {
    #[serde(default)]
    pub items: Vec<String>,
    /// Date as published by the restaurant, e.g. "ti 14.10.".
    #[serde(default)]
    pub date: Option<String>,
}

/// Error body some upstream failures carry.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}
