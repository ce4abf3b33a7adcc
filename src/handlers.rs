// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers: the thin adapter between pipeline outcomes and wire
//! responses.
//!
//! Status codes are part of the public contract: 403 for bans, 429 for
//! rate limits, 400 for invalid input and content rejections, 423 while
//! the wall is locked, 404 for unauthorized preview access, 201 on
//! acceptance. Infrastructure failures are logged and collapsed into a
//! generic 500 body.

use crate::models::CardSubmission;
use crate::pipeline::{MissingField, ReadOutcome, SubmitOutcome};
use crate::{Config, Pipeline};
use axum::{
    extract::rejection::JsonRejection,
    extract::{ConnectInfo, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, warn};

/// Shared application state.
pub struct AppState {
    pub pipeline: Pipeline,
    pub config: Config,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Preview route query parameters.
#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    #[serde(default)]
    pub token: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "card-wall",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Client identity for abuse bookkeeping: first forwarded-for entry,
/// then x-real-ip, then the peer address, then a shared "unknown"
/// bucket.
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }
    match peer {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

/// `GET /api/cards` — the public wall.
pub async fn list_cards(State(state): State<Arc<AppState>>) -> Response {
    match state.pipeline.list_visible(Utc::now()).await {
        Ok(ReadOutcome::Locked { unlock_at_utc }) => (
            StatusCode::LOCKED,
            Json(json!({
                "error": "Cards are locked until Valentine's Day (Amsterdam time).",
                "unlocked": false,
                "unlockAtUtc": iso(unlock_at_utc),
            })),
        )
            .into_response(),
        Ok(ReadOutcome::Visible { cards }) => Json(cards).into_response(),
        Err(err) => {
            error!(error = %err, "failed to load cards");
            load_failure()
        }
    }
}

/// `POST /api/cards` — run a submission through the pipeline.
pub async fn submit_card(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        warn!("unparseable submission body");
        return save_failure();
    };

    let submission = CardSubmission {
        from_name: str_field(&body, "fromName"),
        to_name: str_field(&body, "toName"),
        message: str_field(&body, "message"),
        anonymous: body.get("anonymous").and_then(Value::as_bool).unwrap_or(false),
    };
    let identity = client_identity(&headers, Some(addr));
    let now = Utc::now();

    match state.pipeline.submit(submission, &identity, now).await {
        Ok(outcome) => submit_response(outcome, now, state.config.rate_limit.max_submissions),
        Err(err) => {
            error!(error = %err, "failed to save card");
            save_failure()
        }
    }
}

/// `GET /api/preview/cards?token=…` — pre-launch inspection.
///
/// An unauthorized request gets the same 404 a missing route would,
/// so the endpoint's existence is not leaked. No configured token
/// means nothing ever matches.
pub async fn preview_cards(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PreviewParams>,
) -> Response {
    let authorized = matches!(
        &state.config.preview_token,
        Some(expected) if !expected.is_empty() && params.token == *expected
    );
    if !authorized {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))).into_response();
    }

    match state.pipeline.preview().await {
        Ok(cards) => Json(cards).into_response(),
        Err(err) => {
            error!(error = %err, "failed to load cards (preview)");
            load_failure()
        }
    }
}

/// Map a pipeline decision onto the wire contract.
fn submit_response(outcome: SubmitOutcome, now: DateTime<Utc>, limit: u32) -> Response {
    match outcome {
        SubmitOutcome::Banned => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "banned": true,
                "naughty": true,
                "error": "You are banned from submitting cards.",
                "message": "Repeated inappropriate submissions from your address have been blocked.",
            })),
        )
            .into_response(),

        SubmitOutcome::BannedJustNow { naughty_count } => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "banned": true,
                "naughty": true,
                "naughtyAttempts": naughty_count,
                "error": "Your message contains inappropriate content.",
                "message": "Too many inappropriate submissions. You can no longer submit cards.",
            })),
        )
            .into_response(),

        SubmitOutcome::ContentRejected { naughty_count } => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "naughty": true,
                "naughtyAttempts": naughty_count,
                "error": "Your message contains inappropriate content.",
                "message": "Please keep your card kind. Repeated attempts will get you banned.",
            })),
        )
            .into_response(),

        SubmitOutcome::RateLimited { reset_at } => {
            let retry_ms = (reset_at - now).num_milliseconds().max(0);
            let retry_secs = (retry_ms + 999) / 1000;
            (
                StatusCode::TOO_MANY_REQUESTS,
                [
                    ("Retry-After", retry_secs.to_string()),
                    ("X-RateLimit-Limit", limit.to_string()),
                    ("X-RateLimit-Remaining", "0".to_string()),
                    ("X-RateLimit-Reset", reset_at.timestamp_millis().to_string()),
                ],
                Json(json!({
                    "error": "Too many submissions. Please try again later.",
                    "message": format!(
                        "You can submit up to {limit} cards per hour. Try again after {}.",
                        iso(reset_at)
                    ),
                    "resetAt": iso(reset_at),
                })),
            )
                .into_response()
        }

        SubmitOutcome::InvalidInput { field } => {
            let error = match field {
                MissingField::Message => "Message is required",
                MissingField::Recipient => "Recipient (To) is required",
            };
            (StatusCode::BAD_REQUEST, Json(json!({ "error": error }))).into_response()
        }

        SubmitOutcome::Accepted {
            card,
            remaining,
            reset_at,
        } => (
            StatusCode::CREATED,
            [
                ("X-RateLimit-Limit", limit.to_string()),
                ("X-RateLimit-Remaining", remaining.to_string()),
                ("X-RateLimit-Reset", reset_at.timestamp_millis().to_string()),
            ],
            Json(card),
        )
            .into_response(),
    }
}

fn str_field(body: &Value, key: &str) -> String {
    body.get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

fn iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn save_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Failed to save card" })),
    )
        .into_response()
}

fn load_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Failed to load cards" })),
    )
        .into_response()
}
