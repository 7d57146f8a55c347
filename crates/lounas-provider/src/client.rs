// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the menu API.

use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use tracing::{debug, warn};

use lounas_config::model::ProviderConfig;
use lounas_core::{
    AdapterType, HealthStatus, LounasError, MenuEntry, MenuProvider, PluginAdapter, Restaurant,
};

use crate::types::{ApiErrorResponse, MenuResponse};

/// Fetches menus from `{base_url}/{restaurant}`.
#[derive(Debug, Clone)]
pub struct HttpMenuProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMenuProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, LounasError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|e| {
                LounasError::Config(format!("invalid provider.user_agent header value: {e}"))
            })?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LounasError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch one restaurant. The error string becomes the entry's `error`.
    async fn fetch_one(&self, restaurant: Restaurant) -> Result<MenuEntry, LounasError> {
        let url = format!("{}/{restaurant}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LounasError::Provider {
                message: format!("request to {url} failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(%restaurant, %status, "menu response received");

        let body = response.text().await.map_err(|e| LounasError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(LounasError::provider(format!(
                "menu API returned {status}: {detail}"
            )));
        }

        let menu: MenuResponse = serde_json::from_str(&body).map_err(|e| LounasError::Provider {
            message: format!("unparseable menu for {restaurant}: {e}"),
            source: Some(Box::new(e)),
        })?;

        let entry = MenuEntry::new(restaurant, menu.items);
        Ok(match menu.date {
            Some(date) => entry.with_date(date),
            None => entry,
        })
    }
}

#[async_trait]
impl PluginAdapter for HttpMenuProvider {
    fn name(&self) -> &str {
        "http-menu"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, LounasError> {
        match self.client.get(&self.base_url).send().await {
            Ok(response) if response.status().is_server_error() => Ok(HealthStatus::Degraded(
                format!("menu API returned {}", response.status()),
            )),
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl MenuProvider for HttpMenuProvider {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_data(
        &self,
        restaurants: &[Restaurant],
        additional: &[Restaurant],
    ) -> Result<Vec<MenuEntry>, LounasError> {
        let requests = restaurants
            .iter()
            .map(|r| (*r, false))
            .chain(additional.iter().map(|r| (*r, true)))
            .map(|(restaurant, is_additional)| async move {
                let entry = match self.fetch_one(restaurant).await {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!(%restaurant, error = %e, "menu fetch failed");
                        MenuEntry::failed(restaurant, e.to_string())
                    }
                };
                if is_additional { entry.additional() } else { entry }
            });

        let entries = join_all(requests).await;

        if !entries.is_empty() && entries.iter().all(|e| e.error.is_some()) {
            return Err(LounasError::provider(format!(
                "all {} menu requests failed",
                entries.len()
            )));
        }
        Ok(entries)
    }
}
