// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Audit event routing and submission.
//!
//! The recorder owns the ordering contract: it is invoked only after the
//! primary action has confirmed (contract receipt observed, download fetch
//! started, analysis completed). A submission that still fails after the
//! bounded retry never fails the primary action; the outcome is reported to
//! the caller as `audit_recorded: false` and logged.

use std::sync::Arc;

use tracing::warn;

use super::event::{AuditEvent, AuditEventType};
use crate::config::TopicRoutes;
use crate::ledger::TopicClient;

/// Routes audit events to their per-family consensus topics.
#[derive(Clone)]
pub struct AuditRecorder {
    topics: TopicRoutes,
    client: Arc<TopicClient>,
}

impl AuditRecorder {
    pub fn new(topics: TopicRoutes, client: Arc<TopicClient>) -> Self {
        Self { topics, client }
    }

    /// Topic an event type is routed to.
    pub fn topic_for(&self, event_type: AuditEventType) -> &str {
        match event_type {
            AuditEventType::AddData
            | AuditEventType::DownloadData
            | AuditEventType::ProcessRequestData => &self.topics.provisions,
            AuditEventType::FeedbackAdd | AuditEventType::FeedbackResponse => {
                &self.topics.feedback
            }
            AuditEventType::InsightsRequest => &self.topics.insights,
        }
    }

    /// Submit an event to its topic. Returns whether the ledger accepted it.
    ///
    /// Failures are absorbed here: the audit trail is best-effort and must
    /// never undo an action that already succeeded on chain.
    pub async fn record(&self, event: AuditEvent) -> bool {
        let topic_id = self.topic_for(event.event_type).to_string();

        let payload = match event.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "audit event failed to serialize, dropping");
                return false;
            }
        };

        match self.client.submit_message(&topic_id, &payload).await {
            Ok(_) => true,
            Err(e) => {
                warn!(
                    topic_id = %topic_id,
                    event_type = ?event.event_type,
                    error = %e,
                    "audit submission failed after retries, event lost"
                );
                false
            }
        }
    }
}
