// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Feedback endpoints: create campaigns, attach responses, list.
//!
//! Feedback documents are serialized to JSON, pinned to IPFS, and the
//! campaign contract records the gateway URL. The audit trail carries the
//! encrypted form of that URL, as it always has.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::audit::{AuditEvent, AuditEventType};
use crate::error::ApiError;
use crate::models::{ActionReceipt, Feedback, FeedbackResponseBody, FeedbackSubmission};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/v1/feedback",
    request_body = FeedbackSubmission,
    tag = "Feedback",
    responses(
        (status = 201, body = ActionReceipt),
        (status = 502, description = "Storage or chain unavailable")
    )
)]
pub async fn create_feedback(
    State(state): State<AppState>,
    Json(body): Json<FeedbackSubmission>,
) -> Result<(StatusCode, Json<ActionReceipt>), ApiError> {
    let document = serde_json::to_vec_pretty(&body.content)
        .map_err(|e| ApiError::bad_request(format!("feedback content is not valid JSON: {e}")))?;
    let file_name = format!("{}-feedback.json", body.product_name);

    let stored = state.ipfs.upload(&file_name, document).await?;

    let outcome = state
        .feedback
        .create_feedback(&stored.gateway_url, &body.product_name, &body.description)
        .await?;

    let encrypted_link = state.cipher.encrypt(&stored.gateway_url)?;
    let event = AuditEvent::new(AuditEventType::FeedbackAdd, &body.account_id)
        .with_detail("ipfsHashEncoded", &encrypted_link);
    let audit_recorded = state.recorder.record(event).await;

    Ok((
        StatusCode::CREATED,
        Json(ActionReceipt {
            tx_hash: outcome.tx_hash,
            explorer_url: outcome.explorer_url,
            audit_recorded: Some(audit_recorded),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/v1/feedback/{id}/responses",
    params(("id" = u64, Path, description = "Feedback campaign id")),
    request_body = FeedbackResponseBody,
    tag = "Feedback",
    responses(
        (status = 201, body = ActionReceipt),
        (status = 502, description = "Storage or chain unavailable")
    )
)]
pub async fn respond_to_feedback(
    Path(id): Path<u64>,
    State(state): State<AppState>,
    Json(body): Json<FeedbackResponseBody>,
) -> Result<(StatusCode, Json<ActionReceipt>), ApiError> {
    let document = serde_json::to_vec_pretty(&body.content)
        .map_err(|e| ApiError::bad_request(format!("response content is not valid JSON: {e}")))?;
    let file_name = format!("feedback-{id}-response.json");

    let stored = state.ipfs.upload(&file_name, document).await?;

    let outcome = state
        .feedback
        .submit_response_and_update(id, &stored.gateway_url)
        .await?;

    let encrypted_link = state.cipher.encrypt(&stored.gateway_url)?;
    let event = AuditEvent::new(AuditEventType::FeedbackResponse, &body.account_id)
        .with_detail("ipfsHashEncoded", &encrypted_link);
    let audit_recorded = state.recorder.record(event).await;

    Ok((
        StatusCode::CREATED,
        Json(ActionReceipt {
            tx_hash: outcome.tx_hash,
            explorer_url: outcome.explorer_url,
            audit_recorded: Some(audit_recorded),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/v1/feedback",
    tag = "Feedback",
    responses((status = 200, body = [Feedback]))
)]
pub async fn list_feedback(
    State(state): State<AppState>,
) -> Result<Json<Vec<Feedback>>, ApiError> {
    let campaigns = state.feedback.list_feedback().await?;
    Ok(Json(campaigns))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_document_name_follows_product_name() {
        let body: FeedbackSubmission = serde_json::from_str(
            r#"{
                "account_id": "0.0.7",
                "product_name": "widget",
                "description": "quarterly review",
                "content": {"questions": ["How was it?"]}
            }"#,
        )
        .unwrap();
        assert_eq!(format!("{}-feedback.json", body.product_name), "widget-feedback.json");
    }

    #[test]
    fn content_serializes_pretty_for_storage() {
        let content = serde_json::json!({"rating": 5});
        let document = serde_json::to_vec_pretty(&content).unwrap();
        assert!(String::from_utf8(document).unwrap().contains("\n"));
    }
}
