// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Liveness probe response with a summary of configured dependencies.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub network: String,
    /// Whether LLM content analysis is available.
    pub analysis_configured: bool,
}

#[utoipa::path(
    get,
    path = "/v1/health",
    tag = "Health",
    responses((status = 200, body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        network: state.config.network.name.to_string(),
        analysis_configured: state.analyzer.is_configured(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_config;

    #[tokio::test]
    async fn health_reports_network_and_analysis_state() {
        let state = AppState::from_config(test_config()).unwrap();
        let Json(body) = health(State(state)).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.network, "Hedera Testnet");
        assert!(!body.analysis_configured);
    }
}
