// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! HTTP error boundary.
//!
//! Every typed module error converts into an [`ApiError`] here, so handlers
//! can use `?` throughout and the client always receives
//! `{"error": message}` with a status that reflects which side failed:
//! 4xx for caller problems, 502 for upstream dependencies, 500 for the
//! gateway's own configuration or crypto failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::analysis::AnalysisError;
use crate::blockchain::{ContractCallError, ParamError};
use crate::config::ConfigError;
use crate::crypto::{DecryptionError, EncryptionError};
use crate::ledger::{MirrorError, SubmissionError};
use crate::provision::ProvisionError;
use crate::upload::{IpfsError, ValidationError};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        match e {
            // An empty allowed set is the caller's configuration, not the file.
            ValidationError::NoAllowedTypes => ApiError::bad_request(e.to_string()),
            _ => ApiError::unprocessable(e.to_string()),
        }
    }
}

impl From<ParamError> for ApiError {
    fn from(e: ParamError) -> Self {
        ApiError::unprocessable(e.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(e: ConfigError) -> Self {
        ApiError::internal(e.to_string())
    }
}

impl From<EncryptionError> for ApiError {
    fn from(e: EncryptionError) -> Self {
        ApiError::internal(e.to_string())
    }
}

impl From<DecryptionError> for ApiError {
    fn from(e: DecryptionError) -> Self {
        ApiError::internal(e.to_string())
    }
}

impl From<SubmissionError> for ApiError {
    fn from(e: SubmissionError) -> Self {
        ApiError::bad_gateway(e.to_string())
    }
}

impl From<ContractCallError> for ApiError {
    fn from(e: ContractCallError) -> Self {
        match e {
            ContractCallError::Params(inner) => inner.into(),
            ContractCallError::InvalidAddress(_) => ApiError::unprocessable(e.to_string()),
            _ => ApiError::bad_gateway(e.to_string()),
        }
    }
}

impl From<IpfsError> for ApiError {
    fn from(e: IpfsError) -> Self {
        match e {
            IpfsError::NotFound(_) => ApiError::not_found(e.to_string()),
            _ => ApiError::bad_gateway(e.to_string()),
        }
    }
}

impl From<MirrorError> for ApiError {
    fn from(e: MirrorError) -> Self {
        match e {
            MirrorError::AccountNotFound(_) | MirrorError::TopicNotFound(_) => {
                ApiError::not_found(e.to_string())
            }
            _ => ApiError::bad_gateway(e.to_string()),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::Unconfigured => {
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, e.to_string())
            }
            AnalysisError::UnreadableContent(_) => ApiError::unprocessable(e.to_string()),
            _ => ApiError::bad_gateway(e.to_string()),
        }
    }
}

impl From<ProvisionError> for ApiError {
    fn from(e: ProvisionError) -> Self {
        match e {
            ProvisionError::Validation(inner) => inner.into(),
            ProvisionError::Analysis(inner) => inner.into(),
            ProvisionError::ContentRejected { .. } => ApiError::unprocessable(e.to_string()),
            ProvisionError::Upload(inner) => inner.into(),
            ProvisionError::Encryption(inner) => inner.into(),
            ProvisionError::Contract(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let gw = ApiError::bad_gateway("upstream");
        assert_eq!(gw.status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data"}"#);
    }

    #[test]
    fn caller_errors_map_to_4xx() {
        let too_large: ApiError = ValidationError::TooLarge { size: 10, max: 5 }.into();
        assert_eq!(too_large.status, StatusCode::UNPROCESSABLE_ENTITY);

        let config: ApiError = ValidationError::NoAllowedTypes.into();
        assert_eq!(config.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_errors_map_to_502() {
        let submission: ApiError = SubmissionError::Rejected("INVALID_TOPIC_ID".into()).into();
        assert_eq!(submission.status, StatusCode::BAD_GATEWAY);

        let contract: ApiError = ContractCallError::RpcError("relay down".into()).into();
        assert_eq!(contract.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn missing_content_maps_to_404() {
        let missing: ApiError = IpfsError::NotFound("ipfs://QmX".into()).into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }
}
