// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Audit trail read-back from the mirror node.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;
use crate::models::AuditTrailEntry;
use crate::state::AppState;

const DEFAULT_LIMIT: u32 = 50;

#[derive(Deserialize, IntoParams)]
pub struct TrailQuery {
    /// Maximum entries to return, newest first.
    pub limit: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/v1/audit/{trail}",
    params(
        ("trail" = String, Path, description = "Trail name: provisions, feedback or insights"),
        TrailQuery
    ),
    tag = "Audit",
    responses(
        (status = 200, body = [AuditTrailEntry]),
        (status = 404, description = "Unknown trail name")
    )
)]
pub async fn read_trail(
    Path(trail): Path<String>,
    State(state): State<AppState>,
    Query(query): Query<TrailQuery>,
) -> Result<Json<Vec<AuditTrailEntry>>, ApiError> {
    let topic_id = match trail.as_str() {
        "provisions" => &state.config.topics.provisions,
        "feedback" => &state.config.topics.feedback,
        "insights" => &state.config.topics.insights,
        other => return Err(ApiError::not_found(format!("unknown audit trail `{other}`"))),
    };

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(1000);
    let messages = state.mirror.topic_messages(topic_id, limit).await?;

    let entries = messages
        .into_iter()
        .map(|message| AuditTrailEntry {
            sequence_number: message.sequence_number,
            consensus_timestamp: message.consensus_timestamp,
            event: decode_payload(&message.payload),
        })
        .collect();

    Ok(Json(entries))
}

/// Parse a payload as JSON; historical messages that are not JSON are kept
/// as raw strings rather than dropped.
fn decode_payload(payload: &[u8]) -> serde_json::Value {
    serde_json::from_slice(payload).unwrap_or_else(|_| {
        serde_json::Value::String(String::from_utf8_lossy(payload).into_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_config;
    use axum::http::StatusCode;

    #[test]
    fn json_payloads_decode_structurally() {
        let value = decode_payload(br#"{"eventType":"Add Data","action":"call"}"#);
        assert_eq!(value["eventType"], "Add Data");
    }

    #[test]
    fn non_json_payloads_survive_as_strings() {
        let value = decode_payload(b"plain text marker");
        assert_eq!(value, serde_json::Value::String("plain text marker".into()));
    }

    #[tokio::test]
    async fn unknown_trail_name_is_not_found() {
        let state = AppState::from_config(test_config()).unwrap();
        let err = read_trail(
            Path("payments".into()),
            State(state),
            Query(TrailQuery { limit: None }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
