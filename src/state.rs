// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Application state: every service, constructed once from [`AppConfig`]
//! and shared by the handlers. Services are plain `Arc`s; nothing here is
//! mutable after startup.

use std::sync::Arc;

use crate::analysis::{AnalysisError, ContentAnalyzer, OpenAiClient};
use crate::audit::AuditRecorder;
use crate::blockchain::{ContractCallError, EvmClient, FeedbackContract, MarketplaceContract};
use crate::config::AppConfig;
use crate::crypto::{EncryptionError, LinkCipher};
use crate::ledger::{MirrorClient, MirrorError, SubmissionError, TopicClient};
use crate::provision::ProvisionPipeline;
use crate::upload::{IpfsClient, IpfsError};

/// Startup wiring failure.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("encryption setup failed: {0}")]
    Encryption(#[from] EncryptionError),

    #[error("topic client setup failed: {0}")]
    Ledger(#[from] SubmissionError),

    #[error("mirror client setup failed: {0}")]
    Mirror(#[from] MirrorError),

    #[error("IPFS client setup failed: {0}")]
    Ipfs(#[from] IpfsError),

    #[error("analysis client setup failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("blockchain client setup failed: {0}")]
    Blockchain(#[from] ContractCallError),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub cipher: Arc<LinkCipher>,
    pub mirror: Arc<MirrorClient>,
    pub ipfs: Arc<IpfsClient>,
    pub analyzer: Arc<ContentAnalyzer>,
    pub marketplace: Arc<MarketplaceContract>,
    pub feedback: Arc<FeedbackContract>,
    pub recorder: Arc<AuditRecorder>,
    pub pipeline: ProvisionPipeline,
}

impl AppState {
    /// Wire every service from the loaded configuration.
    pub fn from_config(config: AppConfig) -> Result<Self, StateError> {
        let cipher = Arc::new(LinkCipher::new(&config.encryption_key)?);

        let topic_client = Arc::new(TopicClient::new(
            &config.topic_relay_url,
            &config.operator.account_id,
            config.http_timeout,
            config.retry,
        )?);
        let recorder = Arc::new(AuditRecorder::new(config.topics.clone(), topic_client));

        let mirror = Arc::new(MirrorClient::new(
            config.network.mirror_url,
            config.http_timeout,
        )?);

        let ipfs = Arc::new(IpfsClient::new(
            &config.ipfs.api_url,
            &config.ipfs.gateway_url,
            config.http_timeout,
            config.retry,
        )?);

        let analyzer = Arc::new(ContentAnalyzer::new(OpenAiClient::new(
            config.openai.clone(),
            config.http_timeout,
        )?));

        let evm = Arc::new(EvmClient::new(
            config.network.clone(),
            &config.operator.evm_private_key_hex,
        )?);
        let marketplace = Arc::new(MarketplaceContract::new(
            evm.clone(),
            &config.contracts.data_management,
        )?);
        let feedback = Arc::new(FeedbackContract::new(evm, &config.contracts.feedback)?);

        let pipeline = ProvisionPipeline::new(
            config.upload.clone(),
            analyzer.clone(),
            ipfs.clone(),
            cipher.clone(),
            marketplace.clone(),
            recorder.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            cipher,
            mirror,
            ipfs,
            analyzer,
            marketplace,
            feedback,
            recorder,
            pipeline,
        })
    }
}

/// Test fixtures shared by handler tests. Endpoints use TEST-NET-1
/// addresses so nothing ever leaves the machine.
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::blockchain::types::HEDERA_TESTNET;
    use crate::config::{
        ContractAddresses, IpfsEndpoints, OpenAiSettings, OperatorIdentity, TopicRoutes,
        UploadPolicy,
    };
    use crate::retry::RetryPolicy;
    use std::time::Duration;

    pub(crate) fn test_config() -> AppConfig {
        AppConfig {
            network: HEDERA_TESTNET,
            topic_relay_url: "http://192.0.2.1:1".into(),
            operator: OperatorIdentity {
                account_id: "0.0.1234".into(),
                evm_private_key_hex: "11".repeat(32),
            },
            topics: TopicRoutes {
                provisions: "0.0.100".into(),
                feedback: "0.0.200".into(),
                insights: "0.0.300".into(),
            },
            contracts: ContractAddresses {
                data_management: "0xc02D72Aef09cf406940556Fdf458Be586f634451".into(),
                feedback: "0xFf4A87273E321E200D5214252181027557a07e05".into(),
            },
            encryption_key: "state-test-key".into(),
            ipfs: IpfsEndpoints {
                api_url: "http://192.0.2.1:1".into(),
                gateway_url: "http://192.0.2.1:1".into(),
            },
            openai: OpenAiSettings {
                api_key: None,
                base_url: "https://api.openai.com/v1".into(),
                model: "gpt-4".into(),
            },
            upload: UploadPolicy {
                allowed_mime_types: vec!["application/json".into(), "text/plain".into()],
                max_size_bytes: 1024 * 1024,
            },
            http_timeout: Duration::from_millis(200),
            retry: RetryPolicy::none(),
            host: "127.0.0.1".into(),
            port: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::test_config;
    use super::*;

    #[test]
    fn state_wires_from_a_complete_config() {
        let state = AppState::from_config(test_config()).unwrap();
        assert!(!state.analyzer.is_configured());
        assert_eq!(state.config.topics.provisions, "0.0.100");
    }

    #[test]
    fn empty_encryption_key_fails_wiring() {
        let mut config = test_config();
        config.encryption_key = String::new();
        assert!(matches!(
            AppState::from_config(config),
            Err(StateError::Encryption(_))
        ));
    }

    #[test]
    fn malformed_contract_address_fails_wiring() {
        let mut config = test_config();
        config.contracts.data_management = "0.0.5243021".into();
        assert!(matches!(
            AppState::from_config(config),
            Err(StateError::Blockchain(_))
        ));
    }
}
