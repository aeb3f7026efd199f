// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Audit event model.
//!
//! The serialized form is consumed by an analytics pipeline that predates
//! this service, so field names and event type strings must match the
//! historical payloads byte for byte:
//!
//! ```json
//! {
//!   "eventType": "Add Data",
//!   "timestamp": "2026-02-03T10:15:30Z",
//!   "userId": "0.0.1234",
//!   "dataId": "a2f1…-uuid-v4",
//!   "action": "call",
//!   "details": { "ipfsencoded": "…" }
//! }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Types of auditable marketplace events, serialized to the exact strings
/// the trail has always carried.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum AuditEventType {
    #[serde(rename = "Add Data")]
    AddData,
    #[serde(rename = "Download Data")]
    DownloadData,
    #[serde(rename = "Process request Data")]
    ProcessRequestData,
    #[serde(rename = "Feedback Add")]
    FeedbackAdd,
    #[serde(rename = "FeedbackResponse")]
    FeedbackResponse,
    #[serde(rename = "Insights request")]
    InsightsRequest,
}

/// One audit record. Immutable once constructed; submitted exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditEvent {
    #[serde(rename = "eventType")]
    pub event_type: AuditEventType,
    /// ISO 8601 UTC timestamp.
    #[serde(serialize_with = "iso8601_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Fresh UUID v4 per event.
    #[serde(rename = "dataId")]
    pub data_id: Uuid,
    pub action: String,
    /// Sorted map so serialization is stable.
    pub details: BTreeMap<String, String>,
}

impl AuditEvent {
    /// Create an event for the given type and acting user.
    pub fn new(event_type: AuditEventType, user_id: impl Into<String>) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            user_id: user_id.into(),
            data_id: Uuid::new_v4(),
            action: "call".to_string(),
            details: BTreeMap::new(),
        }
    }

    /// Attach a detail entry.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Override the default `"call"` action.
    #[allow(dead_code)]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Serialize for topic submission.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Serialize timestamps the way the front end's `toISOString()` did:
/// millisecond precision with a `Z` suffix.
fn iso8601_millis<S: serde::Serializer>(
    value: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
