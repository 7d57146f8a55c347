// SPDX-FileCopyrightText: 2026 Lounasbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack request endpoint built on axum.
//!
//! Routes:
//! - `POST /slack/events`: Events API callbacks (signed)
//! - `POST /slack/actions`: interactivity payloads (signed)
//! - `GET /health`: liveness check for the keep-alive ping, always 204
//!
//! Slack expects an acknowledgement within three seconds, so verified
//! requests are answered immediately and the bot runs on a spawned task.

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use lounas_bot::LounasBot;
use lounas_core::LounasError;

use crate::auth::SigningSecret;
use crate::events::{Dispatch, EventEnvelope, InteractionForm, InteractionPayload};

/// Shared state for the request handlers.
#[derive(Clone)]
pub struct SlackState {
    pub bot: Arc<LounasBot>,
    pub secret: SigningSecret,
}

/// Bind address of the endpoint.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// The endpoint's routes.
pub fn router(state: SlackState) -> Router {
    Router::new()
        .route("/slack/events", post(post_events))
        .route("/slack/actions", post(post_actions))
        .route("/health", get(get_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: SlackState,
    shutdown: CancellationToken,
) -> Result<(), LounasError> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LounasError::Chat {
            message: format!("failed to bind slack endpoint to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!("slack endpoint listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| LounasError::Chat {
            message: format!("slack endpoint error: {e}"),
            source: Some(Box::new(e)),
        })
}

fn verified(state: &SlackState, headers: &HeaderMap, body: &[u8]) -> bool {
    match state
        .secret
        .verify(headers, body, chrono::Utc::now().timestamp())
    {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "rejected unverified slack request");
            false
        }
    }
}

/// POST /slack/events
async fn post_events(State(state): State<SlackState>, headers: HeaderMap, body: Bytes) -> Response {
    if !verified(&state, &headers, &body) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let envelope: EventEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "unreadable event payload");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match envelope {
        EventEnvelope::UrlVerification { challenge } => {
            info!("events url verified");
            axum::Json(json!({ "challenge": challenge })).into_response()
        }
        EventEnvelope::EventCallback { event } => {
            match event.into_dispatch() {
                Dispatch::Message(message) => {
                    let bot = state.bot.clone();
                    tokio::spawn(async move {
                        let outcome = bot.handle_message(&message).await;
                        debug!(?outcome, "message handled");
                    });
                }
                Dispatch::HomeOpened { user_id } => {
                    let bot = state.bot.clone();
                    tokio::spawn(async move { bot.handle_home_opened(&user_id).await });
                }
                Dispatch::Nothing => {}
            }
            StatusCode::OK.into_response()
        }
        EventEnvelope::Other => StatusCode::OK.into_response(),
    }
}

/// POST /slack/actions
async fn post_actions(State(state): State<SlackState>, headers: HeaderMap, body: Bytes) -> Response {
    if !verified(&state, &headers, &body) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let payload = serde_urlencoded::from_bytes::<InteractionForm>(&body)
        .map_err(|e| e.to_string())
        .and_then(|form| {
            serde_json::from_str::<InteractionPayload>(&form.payload).map_err(|e| e.to_string())
        });
    let payload = match payload {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "unreadable interaction payload");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let actions = payload.into_block_actions();
    if !actions.is_empty() {
        let bot = state.bot.clone();
        tokio::spawn(async move {
            for action in &actions {
                let outcome = bot.handle_action(action).await;
                debug!(action_id = %action.action_id, ?outcome, "action handled");
            }
        });
    }
    StatusCode::OK.into_response()
}

/// GET /health
async fn get_health() -> StatusCode {
    StatusCode::NO_CONTENT
}
