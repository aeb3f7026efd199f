// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! FeedbackManager contract interactions.
//!
//! Feedback documents live on IPFS; the contract records the gateway URL in
//! the clear (unlike marketplace storage links, which are encrypted). The
//! audit trail still carries the encrypted form.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::sol;

use super::client::{CallOutcome, ContractCallError, EvmClient};
use super::params::{ContractFunctionParams, ParamValue};
use super::types::{GAS_LIMIT_CREATE_FEEDBACK, GAS_LIMIT_FEEDBACK_RESPONSE};
use crate::models::Feedback;

sol! {
    #[sol(rpc)]
    interface IFeedbackManager {
        function feedbackCounter() external view returns (uint256);
        function getFeedbackDetails(uint256 feedbackId)
            external view returns (
                string ipfsHash,
                string topic,
                string description,
                address author,
                uint256 createdAt
            );
    }
}

/// Wrapper around one FeedbackManager deployment.
pub struct FeedbackContract {
    address: Address,
    client: Arc<EvmClient>,
}

impl FeedbackContract {
    pub fn new(client: Arc<EvmClient>, contract_address: &str) -> Result<Self, ContractCallError> {
        Ok(Self {
            address: EvmClient::parse_address(contract_address)?,
            client,
        })
    }

    /// Create a feedback campaign pointing at its IPFS document.
    pub async fn create_feedback(
        &self,
        ipfs_hash: &str,
        topic: &str,
        description: &str,
    ) -> Result<CallOutcome, ContractCallError> {
        let params = ContractFunctionParams::new()
            .add_param("string", "ipfsHash", ParamValue::Str(ipfs_hash.to_string()))
            .add_param("string", "topic", ParamValue::Str(topic.to_string()))
            .add_param(
                "string",
                "description",
                ParamValue::Str(description.to_string()),
            );

        self.client
            .execute_function(
                self.address,
                "createFeedback",
                &params,
                GAS_LIMIT_CREATE_FEEDBACK,
                None,
            )
            .await
    }

    /// Attach a response by replacing the campaign document.
    pub async fn submit_response_and_update(
        &self,
        feedback_id: u64,
        new_ipfs_hash: &str,
    ) -> Result<CallOutcome, ContractCallError> {
        let params = ContractFunctionParams::new()
            .add_param(
                "uint256",
                "feedbackId",
                ParamValue::Uint(feedback_id as u128),
            )
            .add_param(
                "string",
                "newIpfsHash",
                ParamValue::Str(new_ipfs_hash.to_string()),
            );

        self.client
            .execute_function(
                self.address,
                "submitResponseAndUpdate",
                &params,
                GAS_LIMIT_FEEDBACK_RESPONSE,
                None,
            )
            .await
    }

    /// Number of feedback campaigns.
    pub async fn feedback_count(&self) -> Result<u64, ContractCallError> {
        let contract = IFeedbackManager::new(self.address, self.client.provider().clone());
        let count = contract
            .feedbackCounter()
            .call()
            .await
            .map_err(|e| ContractCallError::RpcError(e.to_string()))?;
        Ok(count.to::<u64>())
    }

    /// Details of one campaign.
    pub async fn feedback_details(&self, feedback_id: u64) -> Result<Feedback, ContractCallError> {
        let contract = IFeedbackManager::new(self.address, self.client.provider().clone());
        let details = contract
            .getFeedbackDetails(U256::from(feedback_id))
            .call()
            .await
            .map_err(|e| ContractCallError::RpcError(e.to_string()))?;

        Ok(Feedback {
            id: feedback_id,
            ipfs_hash: details.ipfsHash,
            topic: details.topic,
            description: details.description,
            author: format!("{:?}", details.author),
            created_at: details.createdAt.to::<u64>(),
        })
    }

    /// List every campaign. Campaigns are numbered from 1 on chain.
    pub async fn list_feedback(&self) -> Result<Vec<Feedback>, ContractCallError> {
        let count = self.feedback_count().await?;
        let mut campaigns = Vec::with_capacity(count as usize);
        for id in 1..=count {
            campaigns.push(self.feedback_details(id).await?);
        }
        Ok(campaigns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::HEDERA_TESTNET;

    #[test]
    fn create_feedback_signature_matches_contract_abi() {
        let params = ContractFunctionParams::new()
            .add_param("string", "ipfsHash", ParamValue::Str("Qm1".into()))
            .add_param("string", "topic", ParamValue::Str("widget".into()))
            .add_param("string", "description", ParamValue::Str("desc".into()));
        assert_eq!(
            params.signature("createFeedback"),
            "createFeedback(string,string,string)"
        );
    }

    #[test]
    fn response_signature_matches_contract_abi() {
        let params = ContractFunctionParams::new()
            .add_param("uint256", "feedbackId", ParamValue::Uint(4))
            .add_param("string", "newIpfsHash", ParamValue::Str("Qm2".into()));
        assert_eq!(
            params.signature("submitResponseAndUpdate"),
            "submitResponseAndUpdate(uint256,string)"
        );
    }

    #[test]
    fn wrapper_requires_evm_address() {
        let client = Arc::new(EvmClient::new(HEDERA_TESTNET, &"22".repeat(32)).unwrap());
        assert!(FeedbackContract::new(client, "not-an-address").is_err());
    }
}
