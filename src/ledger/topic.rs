// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Topic message submission through the consensus relay.
//!
//! Submission is best-effort and at-least-once: transient transport failures
//! are retried under the configured [`RetryPolicy`]; a rejected receipt is
//! terminal. There is no local queue, so an event whose attempts are
//! exhausted is lost. Callers decide whether that failure is fatal.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::retry::{RetryPolicy, Transient};

/// Receipt status string the relay reports for an accepted message.
const RECEIPT_SUCCESS: &str = "SUCCESS";

/// Topic submission failure.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("relay transport failed: {0}")]
    Transport(String),

    #[error("relay request timed out")]
    Timeout,

    #[error("relay returned server error {0}")]
    ServerError(StatusCode),

    #[error("relay refused the submission: {0}")]
    Refused(StatusCode),

    #[error("ledger rejected the message with receipt status {0}")]
    Rejected(String),

    #[error("relay response was invalid: {0}")]
    InvalidResponse(String),
}

impl Transient for SubmissionError {
    fn is_transient(&self) -> bool {
        matches!(
            self,
            SubmissionError::Transport(_)
                | SubmissionError::Timeout
                | SubmissionError::ServerError(_)
        )
    }
}

/// Acknowledged submission.
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub topic_id: String,
    pub sequence_number: Option<u64>,
}

#[derive(Serialize)]
struct SubmitBody<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct SubmitResponse {
    status: String,
    #[serde(rename = "sequenceNumber")]
    sequence_number: Option<u64>,
}

/// Client for the topic submission relay, bound to one operator identity.
#[derive(Debug, Clone)]
pub struct TopicClient {
    relay_url: String,
    operator_account: String,
    retry: RetryPolicy,
    http: Client,
}

impl TopicClient {
    /// Build a client for the given relay endpoint.
    pub fn new(
        relay_url: impl Into<String>,
        operator_account: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, SubmissionError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SubmissionError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            relay_url: relay_url.into().trim_end_matches('/').to_string(),
            operator_account: operator_account.into(),
            retry,
            http,
        })
    }

    /// Submit `payload` to the topic and wait for the receipt.
    ///
    /// Returns only after the ledger acknowledged the message with a
    /// `SUCCESS` receipt; any other status is an error.
    pub async fn submit_message(
        &self,
        topic_id: &str,
        payload: &str,
    ) -> Result<SubmitReceipt, SubmissionError> {
        let receipt = self
            .retry
            .run("topic_submit", || self.submit_once(topic_id, payload))
            .await?;

        info!(
            topic_id = %receipt.topic_id,
            sequence_number = ?receipt.sequence_number,
            "audit message accepted by ledger"
        );
        Ok(receipt)
    }

    async fn submit_once(
        &self,
        topic_id: &str,
        payload: &str,
    ) -> Result<SubmitReceipt, SubmissionError> {
        let url = format!("{}/topics/{}/messages", self.relay_url, topic_id);

        let response = self
            .http
            .post(&url)
            .header("X-Operator-Account", &self.operator_account)
            .json(&SubmitBody { message: payload })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SubmissionError::Timeout
                } else {
                    SubmissionError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(SubmissionError::ServerError(status));
        }
        if !status.is_success() {
            return Err(SubmissionError::Refused(status));
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| SubmissionError::InvalidResponse(e.to_string()))?;

        if body.status != RECEIPT_SUCCESS {
            return Err(SubmissionError::Rejected(body.status));
        }

        Ok(SubmitReceipt {
            topic_id: topic_id.to_string(),
            sequence_number: body.sequence_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_server_errors_are_transient() {
        assert!(SubmissionError::Transport("reset".into()).is_transient());
        assert!(SubmissionError::Timeout.is_transient());
        assert!(SubmissionError::ServerError(StatusCode::BAD_GATEWAY).is_transient());
    }

    #[test]
    fn rejections_are_terminal() {
        assert!(!SubmissionError::Refused(StatusCode::FORBIDDEN).is_transient());
        assert!(!SubmissionError::Rejected("INVALID_TOPIC_ID".into()).is_transient());
        assert!(!SubmissionError::InvalidResponse("bad json".into()).is_transient());
    }

    #[test]
    fn relay_url_is_normalized() {
        let client = TopicClient::new(
            "https://relay.example.com/",
            "0.0.1234",
            Duration::from_secs(5),
            RetryPolicy::default(),
        )
        .unwrap();
        assert_eq!(client.relay_url, "https://relay.example.com");
    }

    #[tokio::test]
    async fn unreachable_relay_yields_submission_error() {
        // Reserved TEST-NET-1 address: connections fail fast without
        // touching any real service.
        let client = TopicClient::new(
            "http://192.0.2.1:1",
            "0.0.1234",
            Duration::from_millis(200),
            RetryPolicy {
                max_attempts: 1,
                base_delay: Duration::ZERO,
            },
        )
        .unwrap();

        let result = client.submit_message("0.0.5678", "{}").await;
        assert!(matches!(
            result,
            Err(SubmissionError::Transport(_)) | Err(SubmissionError::Timeout)
        ));
    }

    #[test]
    fn receipt_body_parses_sequence_number() {
        let body: SubmitResponse =
            serde_json::from_str(r#"{"status":"SUCCESS","sequenceNumber":17}"#).unwrap();
        assert_eq!(body.status, "SUCCESS");
        assert_eq!(body.sequence_number, Some(17));
    }
}
