// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Mirror node REST reads.
//!
//! The mirror node is the public, eventually consistent view of the ledger.
//! The gateway uses it for two things: resolving a Hedera account id to its
//! EVM alias (contract reads are keyed by EVM address) and reading an audit
//! topic back for the trail viewer.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::Deserialize;

/// Mirror node query failure.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("mirror node transport failed: {0}")]
    Transport(String),

    #[error("account {0} not found on mirror node")]
    AccountNotFound(String),

    #[error("topic {0} not found on mirror node")]
    TopicNotFound(String),

    #[error("mirror node response was invalid: {0}")]
    InvalidResponse(String),
}

/// A single message read back from a consensus topic.
#[derive(Debug, Clone)]
pub struct TopicMessage {
    pub sequence_number: u64,
    pub consensus_timestamp: String,
    /// Decoded payload bytes (the mirror node returns base64).
    pub payload: Vec<u8>,
}

#[derive(Deserialize)]
struct AccountResponse {
    evm_address: Option<String>,
}

#[derive(Deserialize)]
struct TopicMessagesResponse {
    messages: Vec<RawTopicMessage>,
}

#[derive(Deserialize)]
struct RawTopicMessage {
    sequence_number: u64,
    consensus_timestamp: String,
    message: String,
}

/// Read-only client for the mirror node REST API.
#[derive(Debug, Clone)]
pub struct MirrorClient {
    base_url: String,
    http: Client,
}

impl MirrorClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MirrorError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MirrorError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Resolve a `0.0.x` account id to its EVM address.
    pub async fn resolve_evm_address(&self, account_id: &str) -> Result<String, MirrorError> {
        let url = format!("{}/api/v1/accounts/{}", self.base_url, account_id);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| MirrorError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MirrorError::AccountNotFound(account_id.to_string()));
        }

        let body: AccountResponse = response
            .json()
            .await
            .map_err(|e| MirrorError::InvalidResponse(e.to_string()))?;

        body.evm_address
            .ok_or_else(|| MirrorError::AccountNotFound(account_id.to_string()))
    }

    /// Read the most recent messages of a topic, newest first.
    pub async fn topic_messages(
        &self,
        topic_id: &str,
        limit: u32,
    ) -> Result<Vec<TopicMessage>, MirrorError> {
        let url = format!(
            "{}/api/v1/topics/{}/messages?limit={}&order=desc",
            self.base_url, topic_id, limit
        );

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| MirrorError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MirrorError::TopicNotFound(topic_id.to_string()));
        }

        let body: TopicMessagesResponse = response
            .json()
            .await
            .map_err(|e| MirrorError::InvalidResponse(e.to_string()))?;

        body.messages
            .into_iter()
            .map(|raw| {
                let payload = BASE64
                    .decode(&raw.message)
                    .map_err(|e| MirrorError::InvalidResponse(format!("bad base64 payload: {e}")))?;
                Ok(TopicMessage {
                    sequence_number: raw.sequence_number,
                    consensus_timestamp: raw.consensus_timestamp,
                    payload,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = MirrorClient::new(
            "https://testnet.mirrornode.hedera.com/",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://testnet.mirrornode.hedera.com");
    }

    #[test]
    fn topic_message_payload_decodes_from_base64() {
        let raw: TopicMessagesResponse = serde_json::from_str(
            r#"{
                "messages": [{
                    "sequence_number": 3,
                    "consensus_timestamp": "1706400000.000000001",
                    "message": "eyJldmVudFR5cGUiOiJBZGQgRGF0YSJ9"
                }]
            }"#,
        )
        .unwrap();

        let decoded = BASE64.decode(&raw.messages[0].message).unwrap();
        assert_eq!(decoded, br#"{"eventType":"Add Data"}"#);
    }

    #[test]
    fn account_response_tolerates_missing_evm_address() {
        let body: AccountResponse = serde_json::from_str(r#"{"account":"0.0.1234"}"#).unwrap();
        assert!(body.evm_address.is_none());
    }
}
