// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! IPFS storage client.
//!
//! Uploads go through the pinning API (`/api/v0/add`); downloads are plain
//! gateway GETs against the recorded locator. Fetches retry transient
//! failures under the configured policy. Uploads do not retry: a duplicate
//! add pins the same content twice under providers that bill per request.

use std::time::Duration;

use reqwest::{multipart, Client, StatusCode};
use serde::Deserialize;
use tracing::info;

use crate::retry::{RetryPolicy, Transient};

/// IPFS operation failure.
#[derive(Debug, thiserror::Error)]
pub enum IpfsError {
    #[error("IPFS transport failed: {0}")]
    Transport(String),

    #[error("IPFS request timed out")]
    Timeout,

    #[error("IPFS node returned server error {0}")]
    ServerError(StatusCode),

    #[error("IPFS node refused the request: {0}")]
    Refused(StatusCode),

    #[error("content not found at {0}")]
    NotFound(String),

    #[error("IPFS response was invalid: {0}")]
    InvalidResponse(String),
}

impl Transient for IpfsError {
    fn is_transient(&self) -> bool {
        matches!(
            self,
            IpfsError::Transport(_) | IpfsError::Timeout | IpfsError::ServerError(_)
        )
    }
}

/// Result of pinning a file.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Content hash returned by the node.
    pub locator: String,
    /// Public gateway URL recorded on chain (after encryption).
    pub gateway_url: String,
}

/// Result of fetching a locator.
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

#[derive(Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

/// Client for one IPFS API endpoint and gateway pair.
#[derive(Debug, Clone)]
pub struct IpfsClient {
    api_url: String,
    gateway_url: String,
    retry: RetryPolicy,
    http: Client,
}

impl IpfsClient {
    pub fn new(
        api_url: impl Into<String>,
        gateway_url: impl Into<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, IpfsError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| IpfsError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            gateway_url: gateway_url.into().trim_end_matches('/').to_string(),
            retry,
            http,
        })
    }

    /// Pin a file and return its locator plus the gateway URL.
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<StoredFile, IpfsError> {
        let url = format!("{}/api/v0/add", self.api_url);

        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status.is_server_error() {
            return Err(IpfsError::ServerError(status));
        }
        if !status.is_success() {
            return Err(IpfsError::Refused(status));
        }

        let body: AddResponse = response
            .json()
            .await
            .map_err(|e| IpfsError::InvalidResponse(e.to_string()))?;

        let stored = StoredFile {
            gateway_url: format!("{}/ipfs/{}", self.gateway_url, body.hash),
            locator: body.hash,
        };
        info!(locator = %stored.locator, "file pinned to IPFS");
        Ok(stored)
    }

    /// Fetch previously stored content from its (decrypted) locator URL.
    ///
    /// The filename is recovered from `Content-Disposition` when the gateway
    /// provides one.
    pub async fn fetch(&self, locator_url: &str) -> Result<FetchedFile, IpfsError> {
        self.retry
            .run("ipfs_fetch", || self.fetch_once(locator_url))
            .await
    }

    async fn fetch_once(&self, locator_url: &str) -> Result<FetchedFile, IpfsError> {
        let response = self
            .http
            .get(locator_url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(IpfsError::NotFound(locator_url.to_string()));
        }
        if status.is_server_error() {
            return Err(IpfsError::ServerError(status));
        }
        if !status.is_success() {
            return Err(IpfsError::Refused(status));
        }

        let file_name = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_disposition_filename)
            .unwrap_or_else(|| "downloaded_file".to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| IpfsError::Transport(e.to_string()))?
            .to_vec();

        Ok(FetchedFile { bytes, file_name })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> IpfsError {
    if e.is_timeout() {
        IpfsError::Timeout
    } else {
        IpfsError::Transport(e.to_string())
    }
}

/// Pull `filename=` out of a Content-Disposition header value.
fn parse_disposition_filename(value: &str) -> Option<String> {
    let (_, raw) = value.split_once("filename=")?;
    let name = raw.split(';').next()?.trim().trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_are_transient_but_rejections_are_not() {
        assert!(IpfsError::Timeout.is_transient());
        assert!(IpfsError::ServerError(StatusCode::SERVICE_UNAVAILABLE).is_transient());
        assert!(!IpfsError::NotFound("x".into()).is_transient());
        assert!(!IpfsError::Refused(StatusCode::UNAUTHORIZED).is_transient());
    }

    #[test]
    fn disposition_filename_parsing() {
        assert_eq!(
            parse_disposition_filename(r#"attachment; filename="data.json""#),
            Some("data.json".to_string())
        );
        assert_eq!(
            parse_disposition_filename("attachment; filename=plain.csv"),
            Some("plain.csv".to_string())
        );
        assert_eq!(parse_disposition_filename("inline"), None);
        assert_eq!(parse_disposition_filename(r#"attachment; filename="""#), None);
    }

    #[test]
    fn gateway_url_is_derived_from_hash() {
        let client = IpfsClient::new(
            "https://ipfs.infura.io:5001/",
            "https://ipfs.io/",
            Duration::from_secs(5),
            RetryPolicy::default(),
        )
        .unwrap();
        assert_eq!(client.api_url, "https://ipfs.infura.io:5001");
        assert_eq!(client.gateway_url, "https://ipfs.io");
    }

    #[tokio::test]
    async fn unreachable_gateway_fails_with_transport_error() {
        let client = IpfsClient::new(
            "http://192.0.2.1:1",
            "http://192.0.2.1:1",
            Duration::from_millis(200),
            RetryPolicy {
                max_attempts: 1,
                base_delay: Duration::ZERO,
            },
        )
        .unwrap();

        let result = client.fetch("http://192.0.2.1:1/ipfs/QmMissing").await;
        assert!(matches!(
            result,
            Err(IpfsError::Transport(_)) | Err(IpfsError::Timeout)
        ));
    }
}
