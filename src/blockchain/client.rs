// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Hedera EVM client over the JSON-RPC relay.
//!
//! One provider serves both reads and writes. Writes are signed with the
//! operator's ECDSA key and awaited to their receipt: callers get a
//! [`CallOutcome`] only after the network confirmed the transaction, which
//! is what lets the audit trail record strictly after success.

use std::str::FromStr;

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, U256},
    providers::{
        fillers::{
            BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
            WalletFiller,
        },
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use tracing::info;

use super::params::{ContractFunctionParams, ParamError};
use super::types::NetworkConfig;

/// Relay provider type with gas/nonce/chain-id fillers and operator signing.
pub type RelayProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider<Ethereum>,
>;

/// Errors that can occur during contract operations.
#[derive(Debug, thiserror::Error)]
pub enum ContractCallError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid operator key: {0}")]
    InvalidPrivateKey(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error(transparent)]
    Params(#[from] ParamError),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Transaction {tx_hash} reverted on chain")]
    Reverted { tx_hash: String },
}

/// Confirmed result of a contract write.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    pub tx_hash: String,
    pub explorer_url: String,
    pub block_number: u64,
    pub gas_used: u64,
}

/// Hedera EVM relay client bound to one network and operator identity.
pub struct EvmClient {
    network: NetworkConfig,
    provider: RelayProvider,
}

impl EvmClient {
    /// Create a client signing with the given operator key
    /// (hex, 64 characters, no 0x prefix).
    pub fn new(network: NetworkConfig, operator_key_hex: &str) -> Result<Self, ContractCallError> {
        let url: url::Url = network
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| ContractCallError::InvalidRpcUrl(e.to_string()))?;

        let key_bytes = alloy::hex::decode(operator_key_hex)
            .map_err(|e| ContractCallError::InvalidPrivateKey(e.to_string()))?;
        let signer = PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| ContractCallError::InvalidPrivateKey(e.to_string()))?;
        let wallet = EthereumWallet::from(signer);

        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

        Ok(Self { network, provider })
    }

    /// The underlying provider, for read-only `sol!` contract instances.
    pub fn provider(&self) -> &RelayProvider {
        &self.provider
    }

    /// The network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Parse an EVM contract address.
    pub fn parse_address(raw: &str) -> Result<Address, ContractCallError> {
        Address::from_str(raw).map_err(|e| ContractCallError::InvalidAddress(e.to_string()))
    }

    /// Invoke a state-changing contract function and wait for its receipt.
    ///
    /// Parameters are encoded positionally from `params`; `payable_value` is
    /// attached as `msg.value` (weibar denomination on the relay).
    pub async fn execute_function(
        &self,
        contract: Address,
        function_name: &str,
        params: &ContractFunctionParams,
        gas_limit: u64,
        payable_value: Option<U256>,
    ) -> Result<CallOutcome, ContractCallError> {
        let data = params.encode_input(function_name)?;
        let (max_fee_per_gas, priority_fee) = self.get_gas_prices().await?;

        let mut tx = TransactionRequest::default()
            .to(contract)
            .input(data.into())
            .gas_limit(gas_limit)
            .max_fee_per_gas(max_fee_per_gas)
            .max_priority_fee_per_gas(priority_fee);

        if let Some(value) = payable_value {
            tx = tx.value(value);
        }

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ContractCallError::TransactionFailed(format!("Failed to send: {e}")))?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ContractCallError::RpcError(format!("Failed to get receipt: {e}")))?;

        let tx_hash = format!("{:?}", receipt.transaction_hash);
        if !receipt.status() {
            return Err(ContractCallError::Reverted { tx_hash });
        }

        let outcome = CallOutcome {
            explorer_url: format!("{}/tx/{}", self.network.explorer_url, tx_hash),
            tx_hash,
            block_number: receipt.block_number.unwrap_or(0),
            gas_used: receipt.gas_used as u64,
        };
        info!(
            function = function_name,
            tx_hash = %outcome.tx_hash,
            block_number = outcome.block_number,
            "contract call confirmed"
        );
        Ok(outcome)
    }

    /// Get current gas prices from the relay.
    async fn get_gas_prices(&self) -> Result<(u128, u128), ContractCallError> {
        let block = self
            .provider
            .get_block_by_number(alloy::eips::BlockNumberOrTag::Latest)
            .await
            .map_err(|e| ContractCallError::RpcError(format!("Failed to get block: {e}")))?
            .ok_or_else(|| ContractCallError::RpcError("No latest block".to_string()))?;

        let base_fee: u128 = block
            .header
            .base_fee_per_gas
            .map(|f| f as u128)
            .unwrap_or(710_000_000_000u128); // relay floor when the block omits it

        let priority_fee: u128 = 0; // the relay prices gas through the base fee alone

        // Allow for a base fee increase between estimate and inclusion
        let max_fee = base_fee.saturating_mul(2).saturating_add(priority_fee);

        Ok((max_fee, priority_fee))
    }
}
