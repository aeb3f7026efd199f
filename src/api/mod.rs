// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    audit::{AuditEvent, AuditEventType},
    models::{
        AccessRequest, ActionReceipt, AnalysisReport, AuditTrailEntry, DataSource, DecisionBody,
        Feedback, FeedbackResponseBody, FeedbackSubmission, FollowUpRequest, FollowUpResponse,
        InsightRequest, InsightResponse, ProvisionReceipt, RequestAccessBody, RequestStatus,
    },
    state::AppState,
};

pub mod access;
pub mod audit_trail;
pub mod data_sources;
pub mod feedback;
pub mod health;
pub mod insights;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/health", get(health::health))
        .route(
            "/data-sources",
            get(data_sources::list_data_sources).post(data_sources::provision_data_source),
        )
        .route(
            "/data-sources/{id}/download",
            get(data_sources::download_data_source),
        )
        .route(
            "/data-sources/{id}/access-requests",
            post(access::request_access),
        )
        .route("/access-requests", get(access::list_access_requests))
        .route(
            "/access-requests/{id}/decision",
            post(access::decide_access_request),
        )
        .route(
            "/feedback",
            get(feedback::list_feedback).post(feedback::create_feedback),
        )
        .route("/feedback/{id}/responses", post(feedback::respond_to_feedback))
        .route("/insights", post(insights::request_insights))
        .route("/insights/follow-up", post(insights::follow_up))
        .route("/audit/{trail}", get(audit_trail::read_trail))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        data_sources::provision_data_source,
        data_sources::list_data_sources,
        data_sources::download_data_source,
        access::request_access,
        access::list_access_requests,
        access::decide_access_request,
        feedback::create_feedback,
        feedback::respond_to_feedback,
        feedback::list_feedback,
        insights::request_insights,
        insights::follow_up,
        audit_trail::read_trail
    ),
    components(
        schemas(
            health::HealthResponse,
            DataSource,
            ProvisionReceipt,
            AccessRequest,
            RequestStatus,
            RequestAccessBody,
            DecisionBody,
            ActionReceipt,
            Feedback,
            FeedbackSubmission,
            FeedbackResponseBody,
            InsightRequest,
            InsightResponse,
            FollowUpRequest,
            FollowUpResponse,
            AnalysisReport,
            AuditTrailEntry,
            AuditEvent,
            AuditEventType
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "DataSources", description = "Marketplace listings"),
        (name = "Access", description = "Paid access requests and decisions"),
        (name = "Feedback", description = "Feedback campaigns"),
        (name = "Insights", description = "LLM content analysis"),
        (name = "Audit", description = "Audit trail read-back")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_config;

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::from_config(test_config()).unwrap());
        // Ensure the router can be converted into a service without panicking.
        let _ = app.into_make_service();
    }
}
