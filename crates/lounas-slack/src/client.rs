// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack Web API client implementing [`ChatAdapter`].
//!
//! Web API methods go through slack-morphism with the bot token. Replies to
//! interaction `response_url`s go through [`ResponseUrlClient`], which never
//! sees the token.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use slack_morphism::prelude::*;
use tracing::debug;

use lounas_config::model::SlackConfig;
use lounas_core::types::{ActionResponse, AdapterType, HealthStatus, HomeView, OutboundMessage};
use lounas_core::{ChatAdapter, LounasError, MessageRef, PluginAdapter};

use crate::blocks::to_slack_blocks;

const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

fn api_error<E: std::fmt::Display>(method: &'static str) -> impl Fn(E) -> LounasError {
    move |e| LounasError::chat(format!("{method} failed: {e}"))
}

fn content(message: &OutboundMessage) -> SlackMessageContent {
    SlackMessageContent::new()
        .with_text(message.text.clone())
        .with_blocks(to_slack_blocks(&message.blocks))
}

/// Bot-token authenticated Slack client.
pub struct SlackChat {
    client: SlackHyperClient,
    token: SlackApiToken,
    responder: ResponseUrlClient,
}

impl SlackChat {
    /// Requires `slack.bot_token`.
    pub fn new(config: &SlackConfig) -> Result<Self, LounasError> {
        let token = config
            .bot_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| LounasError::Config("slack.bot_token is required".into()))?;

        let connector = SlackClientHyperConnector::new()
            .map_err(|e| LounasError::chat(format!("failed to create slack connector: {e}")))?
            .with_slack_api_url(config.api_base_url.trim_end_matches('/'));

        Ok(Self {
            client: SlackClient::new(connector),
            token: SlackApiToken::new(SlackApiTokenValue::new(token.to_string())),
            responder: ResponseUrlClient::new()?,
        })
    }
}

#[async_trait]
impl PluginAdapter for SlackChat {
    fn name(&self) -> &str {
        "slack"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Chat
    }

    async fn health_check(&self) -> Result<HealthStatus, LounasError> {
        let session = self.client.open_session(&self.token);
        match session.auth_test().await {
            Ok(_) => {
                debug!("slack auth ok");
                Ok(HealthStatus::Healthy)
            }
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl ChatAdapter for SlackChat {
    async fn post_message(
        &self,
        channel: &str,
        message: &OutboundMessage,
    ) -> Result<MessageRef, LounasError> {
        let request =
            SlackApiChatPostMessageRequest::new(SlackChannelId::new(channel.to_string()), content(message));
        let session = self.client.open_session(&self.token);
        let posted = session
            .chat_post_message(&request)
            .await
            .map_err(api_error("chat.postMessage"))?;
        Ok(MessageRef {
            channel: posted.channel.0,
            ts: posted.ts.0,
        })
    }

    async fn update_message(
        &self,
        target: &MessageRef,
        message: &OutboundMessage,
    ) -> Result<(), LounasError> {
        let request = SlackApiChatUpdateRequest::new(
            SlackChannelId::new(target.channel.clone()),
            content(message),
            SlackTs::new(target.ts.clone()),
        );
        let session = self.client.open_session(&self.token);
        session
            .chat_update(&request)
            .await
            .map_err(api_error("chat.update"))?;
        Ok(())
    }

    async fn respond(
        &self,
        response_url: &str,
        response: &ActionResponse,
    ) -> Result<(), LounasError> {
        self.responder.respond(response_url, response).await
    }

    async fn publish_home(&self, user_id: &str, view: &HomeView) -> Result<(), LounasError> {
        let request = SlackApiViewsPublishRequest::new(
            SlackUserId::new(user_id.to_string()),
            SlackView::Home(SlackHomeView::new(to_slack_blocks(&view.blocks))),
        );
        let session = self.client.open_session(&self.token);
        session
            .views_publish(&request)
            .await
            .map_err(api_error("views.publish"))?;
        Ok(())
    }
}

/// Posts interaction replies to Slack `response_url`s.
///
/// Response URLs authenticate by themselves, so no token is attached.
#[derive(Debug, Clone)]
pub struct ResponseUrlClient {
    client: reqwest::Client,
}

impl ResponseUrlClient {
    pub fn new() -> Result<Self, LounasError> {
        let client = reqwest::Client::builder()
            .timeout(RESPONSE_TIMEOUT)
            .build()
            .map_err(|e| LounasError::Chat {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client })
    }

    pub async fn respond(
        &self,
        response_url: &str,
        response: &ActionResponse,
    ) -> Result<(), LounasError> {
        let body = match response {
            ActionResponse::ReplaceOriginal { blocks } => json!({
                "replace_original": true,
                "blocks": to_slack_blocks(blocks),
            }),
            ActionResponse::Ephemeral { text } => json!({
                "response_type": "ephemeral",
                "replace_original": false,
                "text": text,
            }),
        };

        let response = self
            .client
            .post(response_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LounasError::Chat {
                message: format!("response_url request failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LounasError::chat(format!(
                "response_url returned {status}: {text}"
            )));
        }
        Ok(())
    }
}
