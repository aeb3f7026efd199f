// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! # Runtime Configuration
//!
//! All configuration is read from the environment exactly once at startup and
//! frozen into an [`AppConfig`] that is injected into every service. Nothing
//! in the codebase reads environment variables after boot.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ETHOS_NETWORK` | Hedera network (`testnet` or `mainnet`) | `testnet` |
//! | `ETHOS_RPC_URL` | JSON-RPC relay endpoint override | per network |
//! | `ETHOS_MIRROR_URL` | Mirror node REST endpoint override | per network |
//! | `ETHOS_TOPIC_RELAY_URL` | Topic submission relay endpoint | Required |
//! | `ETHOS_OPERATOR_ACCOUNT_ID` | Operator account (`0.0.x`) signing audit submissions | Required |
//! | `ETHOS_OPERATOR_KEY` | Operator ECDSA private key (hex, no 0x) | Required |
//! | `ETHOS_ENCRYPTION_KEY` | Passphrase for storage pointer encryption | Required |
//! | `ETHOS_PROVISIONS_TOPIC_ID` | Audit topic for data source events | Required |
//! | `ETHOS_FEEDBACK_TOPIC_ID` | Audit topic for feedback events | Required |
//! | `ETHOS_INSIGHTS_TOPIC_ID` | Audit topic for insight requests | Required |
//! | `ETHOS_DATA_CONTRACT` | DataAccessManagement contract (EVM address) | deployed testnet address |
//! | `ETHOS_FEEDBACK_CONTRACT` | FeedbackManager contract (EVM address) | deployed testnet address |
//! | `ETHOS_IPFS_API_URL` | IPFS pinning API base URL | `https://ipfs.infura.io:5001` |
//! | `ETHOS_IPFS_GATEWAY_URL` | IPFS gateway base URL | `https://ipfs.io` |
//! | `ETHOS_OPENAI_API_KEY` | OpenAI API key (analysis disabled when unset) | Optional |
//! | `ETHOS_OPENAI_BASE_URL` | OpenAI-compatible API base URL | `https://api.openai.com/v1` |
//! | `ETHOS_OPENAI_MODEL` | Completion model for content analysis | `gpt-4` |
//! | `ETHOS_MAX_UPLOAD_BYTES` | Upload size ceiling | `5242880` (5 MiB) |
//! | `ETHOS_ALLOWED_MIME_TYPES` | Comma-separated allowed MIME types | see [`DEFAULT_ALLOWED_MIME_TYPES`] |
//! | `ETHOS_HTTP_TIMEOUT_SECS` | Timeout for every outbound HTTP call | `15` |
//! | `ETHOS_RETRY_MAX_ATTEMPTS` | Attempts for transient ledger/IPFS failures | `3` |
//! | `ETHOS_RETRY_BASE_DELAY_MS` | Base backoff delay (doubles per attempt) | `500` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::time::Duration;

use crate::blockchain::types::{NetworkConfig, HEDERA_MAINNET, HEDERA_TESTNET};
use crate::retry::RetryPolicy;

/// MIME types accepted for marketplace uploads when no override is set.
///
/// Matches the set the marketplace front end advertises to users.
pub const DEFAULT_ALLOWED_MIME_TYPES: [&str; 6] = [
    "application/json",
    "text/csv",
    "text/plain",
    "application/pdf",
    "application/xml",
    "text/xml",
];

/// Default upload ceiling: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const DEFAULT_IPFS_API_URL: &str = "https://ipfs.infura.io:5001";
const DEFAULT_IPFS_GATEWAY_URL: &str = "https://ipfs.io";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// DataAccessManagement deployment on Hedera testnet.
const DEFAULT_DATA_CONTRACT: &str = "0xc02D72Aef09cf406940556Fdf458Be586f634451";
/// FeedbackManager deployment on Hedera testnet.
const DEFAULT_FEEDBACK_CONTRACT: &str = "0xFf4A87273E321E200D5214252181027557a07e05";

/// Configuration load failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Fixed operator identity used to sign contract calls and audit submissions.
#[derive(Debug, Clone)]
pub struct OperatorIdentity {
    /// Hedera account id, `0.0.x` form.
    pub account_id: String,
    /// ECDSA private key, hex without `0x` prefix.
    pub evm_private_key_hex: String,
}

/// One audit topic per event family, mirroring the ledger topology.
#[derive(Debug, Clone)]
pub struct TopicRoutes {
    pub provisions: String,
    pub feedback: String,
    pub insights: String,
}

/// Deployed contract addresses (EVM form).
#[derive(Debug, Clone)]
pub struct ContractAddresses {
    pub data_management: String,
    pub feedback: String,
}

/// IPFS endpoints: pinning API plus public gateway.
#[derive(Debug, Clone)]
pub struct IpfsEndpoints {
    pub api_url: String,
    pub gateway_url: String,
}

/// OpenAI connection settings. Analysis features are disabled when
/// `api_key` is `None`.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

/// Upload acceptance policy applied before any storage or contract call.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub allowed_mime_types: Vec<String>,
    pub max_size_bytes: u64,
}

/// Complete, immutable application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub topic_relay_url: String,
    pub operator: OperatorIdentity,
    pub topics: TopicRoutes,
    pub contracts: ContractAddresses,
    pub encryption_key: String,
    pub ipfs: IpfsEndpoints,
    pub openai: OpenAiSettings,
    pub upload: UploadPolicy,
    pub http_timeout: Duration,
    pub retry: RetryPolicy,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    /// Load and validate the full configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut network = match env_or_default("ETHOS_NETWORK", "testnet").as_str() {
            "testnet" => HEDERA_TESTNET,
            "mainnet" => HEDERA_MAINNET,
            other => {
                return Err(ConfigError::Invalid {
                    name: "ETHOS_NETWORK",
                    reason: format!("expected `testnet` or `mainnet`, got `{other}`"),
                })
            }
        };
        if let Ok(rpc) = env::var("ETHOS_RPC_URL") {
            network.rpc_url = leak(rpc);
        }
        if let Ok(mirror) = env::var("ETHOS_MIRROR_URL") {
            network.mirror_url = leak(mirror);
        }

        let upload = UploadPolicy {
            allowed_mime_types: match env::var("ETHOS_ALLOWED_MIME_TYPES") {
                Ok(raw) => raw
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                Err(_) => DEFAULT_ALLOWED_MIME_TYPES
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
            max_size_bytes: env_parse("ETHOS_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        };
        if upload.allowed_mime_types.is_empty() {
            return Err(ConfigError::Invalid {
                name: "ETHOS_ALLOWED_MIME_TYPES",
                reason: "must list at least one MIME type".to_string(),
            });
        }

        Ok(Self {
            network,
            topic_relay_url: env_required("ETHOS_TOPIC_RELAY_URL")?,
            operator: OperatorIdentity {
                account_id: env_required("ETHOS_OPERATOR_ACCOUNT_ID")?,
                evm_private_key_hex: env_required("ETHOS_OPERATOR_KEY")?,
            },
            topics: TopicRoutes {
                provisions: env_required("ETHOS_PROVISIONS_TOPIC_ID")?,
                feedback: env_required("ETHOS_FEEDBACK_TOPIC_ID")?,
                insights: env_required("ETHOS_INSIGHTS_TOPIC_ID")?,
            },
            contracts: ContractAddresses {
                data_management: env_or_default("ETHOS_DATA_CONTRACT", DEFAULT_DATA_CONTRACT),
                feedback: env_or_default("ETHOS_FEEDBACK_CONTRACT", DEFAULT_FEEDBACK_CONTRACT),
            },
            encryption_key: env_required("ETHOS_ENCRYPTION_KEY")?,
            ipfs: IpfsEndpoints {
                api_url: env_or_default("ETHOS_IPFS_API_URL", DEFAULT_IPFS_API_URL),
                gateway_url: env_or_default("ETHOS_IPFS_GATEWAY_URL", DEFAULT_IPFS_GATEWAY_URL),
            },
            openai: OpenAiSettings {
                api_key: env::var("ETHOS_OPENAI_API_KEY")
                    .ok()
                    .filter(|k| !k.trim().is_empty()),
                base_url: env_or_default("ETHOS_OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
                model: env_or_default("ETHOS_OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            },
            upload,
            http_timeout: Duration::from_secs(env_parse(
                "ETHOS_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            retry: RetryPolicy {
                max_attempts: env_parse("ETHOS_RETRY_MAX_ATTEMPTS", 3u32)?,
                base_delay: Duration::from_millis(env_parse("ETHOS_RETRY_BASE_DELAY_MS", 500u64)?),
            },
            host: env_or_default("HOST", "0.0.0.0"),
            port: env_parse("PORT", 8080u16)?,
        })
    }
}

fn env_required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Network URL overrides live for the whole process lifetime.
fn leak(value: String) -> &'static str {
    Box::leak(value.into_boxed_str())
}
