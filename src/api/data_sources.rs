// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Data source endpoints: provision, list, download.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::audit::{AuditEvent, AuditEventType};
use crate::blockchain::types::{parse_amount, TINYBAR_DECIMALS};
use crate::error::ApiError;
use crate::models::{DataSource, ProvisionReceipt};
use crate::provision::ProvisionInput;
use crate::state::AppState;

#[derive(Deserialize, IntoParams)]
pub struct AccountQuery {
    /// Viewing account (`0.0.x`).
    pub account_id: String,
}

/// Multipart fields accepted by the provision endpoint.
#[derive(Default)]
struct ProvisionForm {
    file_name: Option<String>,
    bytes: Option<Vec<u8>>,
    name: Option<String>,
    data_type: Option<String>,
    access_fee: Option<String>,
    description: Option<String>,
    analyze: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/v1/data-sources",
    tag = "DataSources",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "Fields: file, name, data_type, access_fee (HBAR), description, analyze"
    ),
    responses(
        (status = 201, body = ProvisionReceipt),
        (status = 422, description = "File or fee rejected"),
        (status = 502, description = "Storage or chain unavailable")
    )
)]
pub async fn provision_data_source(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ProvisionReceipt>), ApiError> {
    let mut form = ProvisionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                form.file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("failed to read file: {e}")))?;
                form.bytes = Some(bytes.to_vec());
            }
            "name" => form.name = Some(read_text(field).await?),
            "data_type" => form.data_type = Some(read_text(field).await?),
            "access_fee" => form.access_fee = Some(read_text(field).await?),
            "description" => form.description = Some(read_text(field).await?),
            "analyze" => {
                let raw = read_text(field).await?;
                form.analyze = Some(raw.parse().map_err(|_| {
                    ApiError::bad_request("`analyze` must be `true` or `false`")
                })?);
            }
            other => {
                return Err(ApiError::bad_request(format!(
                    "unexpected multipart field `{other}`"
                )))
            }
        }
    }

    let bytes = form
        .bytes
        .ok_or_else(|| ApiError::bad_request("missing `file` field"))?;
    let file_name = form
        .file_name
        .ok_or_else(|| ApiError::bad_request("uploaded file has no name"))?;
    let name = require(form.name, "name")?;
    let data_type = require(form.data_type, "data_type")?;
    let access_fee = require(form.access_fee, "access_fee")?;
    let description = form.description.unwrap_or_default();

    let access_fee_tinybar = parse_amount(&access_fee, TINYBAR_DECIMALS)
        .map_err(|reason| ApiError::unprocessable(format!("invalid access_fee: {reason}")))?;

    let input = ProvisionInput {
        account_id: query.account_id,
        file_name,
        bytes,
        name,
        data_type,
        access_fee_tinybar,
        description,
        // Analysis defaults to on whenever credentials exist.
        analyze: form.analyze.unwrap_or_else(|| state.analyzer.is_configured()),
    };

    let receipt = state.pipeline.run(input).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

#[utoipa::path(
    get,
    path = "/v1/data-sources",
    params(AccountQuery),
    tag = "DataSources",
    responses((status = 200, body = [DataSource]))
)]
pub async fn list_data_sources(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> Result<Json<Vec<DataSource>>, ApiError> {
    let viewer = state.mirror.resolve_evm_address(&query.account_id).await?;
    let viewer = crate::blockchain::EvmClient::parse_address(&viewer)?;
    let sources = state.marketplace.list_data_sources(viewer).await?;
    Ok(Json(sources))
}

#[utoipa::path(
    get,
    path = "/v1/data-sources/{id}/download",
    params(
        ("id" = u64, Path, description = "Data source id"),
        AccountQuery
    ),
    tag = "DataSources",
    responses(
        (status = 200, description = "File bytes with original filename"),
        (status = 404, description = "Unknown data source or missing content")
    )
)]
pub async fn download_data_source(
    Path(id): Path<u64>,
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer = state.mirror.resolve_evm_address(&query.account_id).await?;
    let viewer = crate::blockchain::EvmClient::parse_address(&viewer)?;
    let source = state.marketplace.data_source_details(id, viewer).await?;

    let locator = state.cipher.decrypt(&source.storage_link)?;
    let fetched = state.ipfs.fetch(&locator).await?;

    // The fetch succeeded; record the download on the trail.
    let event = AuditEvent::new(AuditEventType::DownloadData, &query.account_id)
        .with_detail("ipfsencoded", &source.storage_link);
    state.recorder.record(event).await;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", fetched.file_name))
            .map_err(|_| ApiError::internal("invalid filename in storage response"))?,
    );
    Ok((headers, fetched.bytes))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart field: {e}")))
}

fn require(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("missing `{name}` field")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_missing_and_blank_fields() {
        assert!(require(None, "name").is_err());
        assert!(require(Some("  ".into()), "name").is_err());
        assert_eq!(require(Some("ok".into()), "name").unwrap(), "ok");
    }

    #[test]
    fn fee_strings_parse_to_tinybar() {
        let fee = parse_amount("2.5", TINYBAR_DECIMALS).unwrap();
        assert_eq!(fee, alloy::primitives::U256::from(250_000_000u64));
    }
}
