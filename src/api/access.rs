// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Access request endpoints: request, list, decide.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::data_sources::AccountQuery;
use crate::audit::{AuditEvent, AuditEventType};
use crate::blockchain::types::{parse_amount, WEIBAR_DECIMALS};
use crate::error::ApiError;
use crate::models::{AccessRequest, ActionReceipt, DecisionBody, RequestAccessBody};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/v1/data-sources/{id}/access-requests",
    params(("id" = u64, Path, description = "Data source id")),
    request_body = RequestAccessBody,
    tag = "Access",
    responses(
        (status = 201, body = ActionReceipt),
        (status = 422, description = "Invalid fee"),
        (status = 502, description = "Chain unavailable")
    )
)]
pub async fn request_access(
    Path(id): Path<u64>,
    State(state): State<AppState>,
    Json(body): Json<RequestAccessBody>,
) -> Result<(StatusCode, Json<ActionReceipt>), ApiError> {
    let fee_weibar = parse_amount(&body.fee_hbar, WEIBAR_DECIMALS)
        .map_err(|reason| ApiError::unprocessable(format!("invalid fee_hbar: {reason}")))?;

    let outcome = state
        .marketplace
        .request_access(id, &body.purpose, fee_weibar)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ActionReceipt {
            tx_hash: outcome.tx_hash,
            explorer_url: outcome.explorer_url,
            audit_recorded: None,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/v1/access-requests",
    params(AccountQuery),
    tag = "Access",
    responses((status = 200, body = [AccessRequest]))
)]
pub async fn list_access_requests(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> Result<Json<Vec<AccessRequest>>, ApiError> {
    let viewer = state.mirror.resolve_evm_address(&query.account_id).await?;
    let viewer = crate::blockchain::EvmClient::parse_address(&viewer)?;
    let requests = state.marketplace.list_requests(viewer).await?;
    Ok(Json(requests))
}

#[utoipa::path(
    post,
    path = "/v1/access-requests/{id}/decision",
    params(("id" = u64, Path, description = "Access request id")),
    request_body = DecisionBody,
    tag = "Access",
    responses(
        (status = 200, body = ActionReceipt),
        (status = 502, description = "Chain unavailable")
    )
)]
pub async fn decide_access_request(
    Path(id): Path<u64>,
    State(state): State<AppState>,
    Json(body): Json<DecisionBody>,
) -> Result<Json<ActionReceipt>, ApiError> {
    let outcome = state
        .marketplace
        .process_access_request(id, body.approved)
        .await?;

    // Receipt confirmed; record the decision on the trail.
    let event = AuditEvent::new(AuditEventType::ProcessRequestData, &body.account_id)
        .with_detail("functionName", "processAccessRequest");
    let audit_recorded = state.recorder.record(event).await;

    Ok(Json(ActionReceipt {
        tx_hash: outcome.tx_hash,
        explorer_url: outcome.explorer_url,
        audit_recorded: Some(audit_recorded),
    }))
}
