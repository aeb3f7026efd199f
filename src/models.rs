// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for automatic JSON handling
//! and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Data sources**: marketplace listings backed by the
//!   DataAccessManagement contract
//! - **Access requests**: paid requests against a listing and their decisions
//! - **Feedback**: feedback campaigns and responses (FeedbackManager contract)
//! - **Insights**: LLM analysis requests and reports
//! - **Audit**: read-back entries from the consensus audit topics

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Data Source Models
// =============================================================================

/// A marketplace data source as recorded on chain.
///
/// `storage_link` is the encrypted pointer exactly as contract state holds
/// it; it is only decrypted server-side during a download.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DataSource {
    pub id: u64,
    pub name: String,
    pub data_type: String,
    /// Size of the underlying file in bytes.
    pub size: u64,
    /// Unix timestamp of the last on-chain update.
    pub last_updated: u64,
    pub is_active: bool,
    /// Owner EVM address.
    pub owner: String,
    /// Access fee in HBAR.
    pub access_fee_hbar: String,
    /// Encrypted storage pointer.
    pub storage_link: String,
    pub metadata_link: String,
}

/// Outcome of a completed provision pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProvisionReceipt {
    pub tx_hash: String,
    pub explorer_url: String,
    /// Encrypted pointer now recorded in contract state.
    pub encrypted_link: String,
    /// Whether the audit event reached the ledger.
    pub audit_recorded: bool,
    /// Content analysis report, when analysis ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisReport>,
}

// =============================================================================
// Access Request Models
// =============================================================================

/// Decision state of an access request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Unknown,
}

impl RequestStatus {
    /// Decode the contract's status enum.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => RequestStatus::Pending,
            1 => RequestStatus::Approved,
            2 => RequestStatus::Rejected,
            _ => RequestStatus::Unknown,
        }
    }
}

/// An access request against a data source.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AccessRequest {
    pub request_id: u64,
    /// Requester EVM address.
    pub requester: String,
    pub data_source_id: u64,
    pub purpose: String,
    pub status: RequestStatus,
    /// Unix timestamp of the request.
    pub request_date: u64,
    /// Amount paid, in HBAR.
    pub paid_amount_hbar: String,
}

/// Body for `POST /v1/data-sources/{id}/access-requests`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestAccessBody {
    /// Requesting account (`0.0.x`).
    pub account_id: String,
    /// Stated purpose recorded on chain.
    pub purpose: String,
    /// Fee to attach, in HBAR (must cover the listing's access fee).
    pub fee_hbar: String,
}

/// Body for `POST /v1/access-requests/{id}/decision`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DecisionBody {
    /// Deciding account (`0.0.x`), the data source owner.
    pub account_id: String,
    pub approved: bool,
}

/// Confirmed transaction plus audit status; shared by simple write actions.
///
/// `audit_recorded` is absent for actions that have never emitted an audit
/// event (access requests).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActionReceipt {
    pub tx_hash: String,
    pub explorer_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_recorded: Option<bool>,
}

// =============================================================================
// Feedback Models
// =============================================================================

/// A feedback campaign as recorded on chain.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Feedback {
    pub id: u64,
    /// Gateway URL of the feedback document.
    pub ipfs_hash: String,
    pub topic: String,
    pub description: String,
    /// Author EVM address.
    pub author: String,
    /// Unix timestamp of creation.
    pub created_at: u64,
}

/// Body for `POST /v1/feedback`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackSubmission {
    /// Submitting account (`0.0.x`).
    pub account_id: String,
    /// Campaign subject, e.g. a product name.
    pub product_name: String,
    pub description: String,
    /// Structured feedback document stored on IPFS.
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
}

/// Body for `POST /v1/feedback/{id}/responses`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackResponseBody {
    /// Responding account (`0.0.x`).
    pub account_id: String,
    /// Updated feedback document stored on IPFS.
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
}

// =============================================================================
// Insight Models
// =============================================================================

/// Body for `POST /v1/insights`.
///
/// Exactly one of `locator` (fetch from storage) or `content` (inline text)
/// must be provided.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InsightRequest {
    /// Requesting account (`0.0.x`).
    pub account_id: String,
    /// Storage locator URL to fetch and analyze.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
    /// Inline content to analyze.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Original file name, when analyzing an uploaded file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Body for `POST /v1/insights/follow-up`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FollowUpRequest {
    /// The analysis the question refers to.
    pub previous_analysis: String,
    pub question: String,
}

/// Content analysis verdict.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AnalysisReport {
    pub is_valid: bool,
    pub insights: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Response for insight endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InsightResponse {
    pub report: AnalysisReport,
    pub audit_recorded: bool,
}

/// Response for `POST /v1/insights/follow-up`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FollowUpResponse {
    pub answer: String,
}

// =============================================================================
// Audit Trail Models
// =============================================================================

/// One message read back from an audit topic.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditTrailEntry {
    pub sequence_number: u64,
    pub consensus_timestamp: String,
    /// The recorded event payload. Kept as raw JSON so historical entries
    /// with drifted shapes still render.
    #[schema(value_type = Object)]
    pub event: serde_json::Value,
}
