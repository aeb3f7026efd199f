// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Insight endpoints: LLM analysis of stored or inline content.

use axum::{extract::State, Json};

use crate::audit::{AuditEvent, AuditEventType};
use crate::error::ApiError;
use crate::models::{FollowUpRequest, FollowUpResponse, InsightRequest, InsightResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/v1/insights",
    request_body = InsightRequest,
    tag = "Insights",
    responses(
        (status = 200, body = InsightResponse),
        (status = 400, description = "Neither locator nor content provided"),
        (status = 503, description = "Analysis not configured")
    )
)]
pub async fn request_insights(
    State(state): State<AppState>,
    Json(body): Json<InsightRequest>,
) -> Result<Json<InsightResponse>, ApiError> {
    let (bytes, file_name, locator) = match (&body.locator, &body.content) {
        (Some(locator), None) => {
            let fetched = state.ipfs.fetch(locator).await?;
            (fetched.bytes, fetched.file_name, Some(locator.clone()))
        }
        (None, Some(content)) => {
            let name = body
                .file_name
                .clone()
                .unwrap_or_else(|| "inline-content".to_string());
            (content.clone().into_bytes(), name, None)
        }
        _ => {
            return Err(ApiError::bad_request(
                "provide exactly one of `locator` or `content`",
            ))
        }
    };

    let report = state.analyzer.analyze(&file_name, &bytes).await?;

    // Analysis completed; record the request on the trail. A fetched
    // locator is recorded encrypted, an inline document by its name.
    let event = match &locator {
        Some(url) => {
            let encrypted = state.cipher.encrypt(url)?;
            AuditEvent::new(AuditEventType::InsightsRequest, &body.account_id)
                .with_detail("ipfsHashEncoded", &encrypted)
        }
        None => AuditEvent::new(AuditEventType::InsightsRequest, &body.account_id)
            .with_detail("fileName", &file_name),
    };
    let audit_recorded = state.recorder.record(event).await;

    Ok(Json(InsightResponse {
        report,
        audit_recorded,
    }))
}

#[utoipa::path(
    post,
    path = "/v1/insights/follow-up",
    request_body = FollowUpRequest,
    tag = "Insights",
    responses(
        (status = 200, body = FollowUpResponse),
        (status = 503, description = "Analysis not configured")
    )
)]
pub async fn follow_up(
    State(state): State<AppState>,
    Json(body): Json<FollowUpRequest>,
) -> Result<Json<FollowUpResponse>, ApiError> {
    let answer = state
        .analyzer
        .ask_follow_up(&body.previous_analysis, &body.question)
        .await?;
    Ok(Json(FollowUpResponse { answer }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_config;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn request_without_locator_or_content_is_a_bad_request() {
        let state = AppState::from_config(test_config()).unwrap();
        let body = InsightRequest {
            account_id: "0.0.1".into(),
            locator: None,
            content: None,
            file_name: None,
        };
        let err = request_insights(State(state), Json(body)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn inline_analysis_without_credentials_is_unavailable() {
        let state = AppState::from_config(test_config()).unwrap();
        let body = InsightRequest {
            account_id: "0.0.1".into(),
            locator: None,
            content: Some("a,b\n1,2".into()),
            file_name: Some("rows.csv".into()),
        };
        let err = request_insights(State(state), Json(body)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
