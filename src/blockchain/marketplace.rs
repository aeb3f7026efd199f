// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! DataAccessManagement contract interactions.
//!
//! Writes go through the dynamic parameter path so call sites build the same
//! ordered `(type, name, value)` lists the contract ABI expects; reads use a
//! typed `sol!` interface. Read results are keyed by the viewer's EVM
//! address, which the contract uses for access decisions on the storage link
//! field.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use alloy::sol;

use super::client::{CallOutcome, ContractCallError, EvmClient};
use super::params::{ContractFunctionParams, ParamValue};
use super::types::{
    format_amount, GAS_LIMIT_ADD_DATA_SOURCE, GAS_LIMIT_PROCESS_REQUEST,
    GAS_LIMIT_REQUEST_ACCESS, TINYBAR_DECIMALS,
};
use crate::models::{AccessRequest, DataSource, RequestStatus};

sol! {
    #[sol(rpc)]
    interface IDataAccessManagement {
        function dataSourceCounter() external view returns (uint256);
        function requestCounter() external view returns (uint256);
        function getDataSourceDetails(uint256 dataSourceId, address viewer)
            external view returns (
                string name,
                string dataType,
                uint256 size,
                uint256 lastUpdated,
                bool isActive,
                address owner,
                uint256 accessFee,
                string storageLink,
                string metadataLink
            );
        function getRequestDetails(uint256 requestId, address viewer)
            external view returns (
                address requester,
                uint256 dataSourceId,
                string purpose,
                uint8 status,
                uint256 requestDate,
                uint256 paidAmount
            );
    }
}

/// Wrapper around one DataAccessManagement deployment.
pub struct MarketplaceContract {
    address: Address,
    client: Arc<EvmClient>,
}

impl MarketplaceContract {
    pub fn new(client: Arc<EvmClient>, contract_address: &str) -> Result<Self, ContractCallError> {
        Ok(Self {
            address: EvmClient::parse_address(contract_address)?,
            client,
        })
    }

    /// Register a new data source listing.
    ///
    /// `storage_link` must already be the encrypted pointer; raw locators
    /// never reach contract state.
    pub async fn add_data_source(
        &self,
        name: &str,
        data_type: &str,
        size: u64,
        storage_link: &str,
        metadata_link: &str,
        access_fee_tinybar: U256,
    ) -> Result<CallOutcome, ContractCallError> {
        let params = ContractFunctionParams::new()
            .add_param("string", "name", ParamValue::Str(name.to_string()))
            .add_param("string", "dataType", ParamValue::Str(data_type.to_string()))
            .add_param("uint256", "size", ParamValue::Uint(size as u128))
            .add_param(
                "string",
                "storageLink",
                ParamValue::Str(storage_link.to_string()),
            )
            .add_param(
                "string",
                "metadataLink",
                ParamValue::Str(metadata_link.to_string()),
            )
            .add_param(
                "uint256",
                "accessFee",
                ParamValue::Uint(access_fee_tinybar.to::<u128>()),
            );

        self.client
            .execute_function(
                self.address,
                "addDataSource",
                &params,
                GAS_LIMIT_ADD_DATA_SOURCE,
                None,
            )
            .await
    }

    /// Request paid access to a listing; `fee_weibar` rides as `msg.value`.
    pub async fn request_access(
        &self,
        data_source_id: u64,
        purpose: &str,
        fee_weibar: U256,
    ) -> Result<CallOutcome, ContractCallError> {
        let params = ContractFunctionParams::new()
            .add_param(
                "uint256",
                "dataSourceId",
                ParamValue::Uint(data_source_id as u128),
            )
            .add_param("string", "purpose", ParamValue::Str(purpose.to_string()));

        self.client
            .execute_function(
                self.address,
                "requestAccess",
                &params,
                GAS_LIMIT_REQUEST_ACCESS,
                Some(fee_weibar),
            )
            .await
    }

    /// Approve or reject a pending access request.
    pub async fn process_access_request(
        &self,
        request_id: u64,
        approved: bool,
    ) -> Result<CallOutcome, ContractCallError> {
        let params = ContractFunctionParams::new()
            .add_param("uint256", "requestId", ParamValue::Uint(request_id as u128))
            .add_param("bool", "approved", ParamValue::Bool(approved));

        self.client
            .execute_function(
                self.address,
                "processAccessRequest",
                &params,
                GAS_LIMIT_PROCESS_REQUEST,
                None,
            )
            .await
    }

    /// Number of registered data sources.
    pub async fn data_source_count(&self) -> Result<u64, ContractCallError> {
        let contract = IDataAccessManagement::new(self.address, self.client.provider().clone());
        let count = contract
            .dataSourceCounter()
            .call()
            .await
            .map_err(|e| ContractCallError::RpcError(e.to_string()))?;
        Ok(count.to::<u64>())
    }

    /// Number of access requests ever made.
    pub async fn request_count(&self) -> Result<u64, ContractCallError> {
        let contract = IDataAccessManagement::new(self.address, self.client.provider().clone());
        let count = contract
            .requestCounter()
            .call()
            .await
            .map_err(|e| ContractCallError::RpcError(e.to_string()))?;
        Ok(count.to::<u64>())
    }

    /// Details of one data source, as visible to `viewer`.
    pub async fn data_source_details(
        &self,
        data_source_id: u64,
        viewer: Address,
    ) -> Result<DataSource, ContractCallError> {
        let contract = IDataAccessManagement::new(self.address, self.client.provider().clone());
        let details = contract
            .getDataSourceDetails(U256::from(data_source_id), viewer)
            .call()
            .await
            .map_err(|e| ContractCallError::RpcError(e.to_string()))?;

        Ok(DataSource {
            id: data_source_id,
            name: details.name,
            data_type: details.dataType,
            size: details.size.to::<u64>(),
            last_updated: details.lastUpdated.to::<u64>(),
            is_active: details.isActive,
            owner: format!("{:?}", details.owner),
            access_fee_hbar: format_amount(details.accessFee, TINYBAR_DECIMALS),
            storage_link: details.storageLink,
            metadata_link: details.metadataLink,
        })
    }

    /// Details of one access request, as visible to `viewer`.
    pub async fn request_details(
        &self,
        request_id: u64,
        viewer: Address,
    ) -> Result<AccessRequest, ContractCallError> {
        let contract = IDataAccessManagement::new(self.address, self.client.provider().clone());
        let details = contract
            .getRequestDetails(U256::from(request_id), viewer)
            .call()
            .await
            .map_err(|e| ContractCallError::RpcError(e.to_string()))?;

        Ok(AccessRequest {
            request_id,
            requester: format!("{:?}", details.requester),
            data_source_id: details.dataSourceId.to::<u64>(),
            purpose: details.purpose,
            status: RequestStatus::from_code(details.status),
            request_date: details.requestDate.to::<u64>(),
            paid_amount_hbar: format_amount(details.paidAmount, TINYBAR_DECIMALS),
        })
    }

    /// List every data source, visible to `viewer`. Sources are numbered
    /// from 1 on chain.
    pub async fn list_data_sources(
        &self,
        viewer: Address,
    ) -> Result<Vec<DataSource>, ContractCallError> {
        let count = self.data_source_count().await?;
        let mut sources = Vec::with_capacity(count as usize);
        for id in 1..=count {
            sources.push(self.data_source_details(id, viewer).await?);
        }
        Ok(sources)
    }

    /// List every access request, visible to `viewer`.
    pub async fn list_requests(
        &self,
        viewer: Address,
    ) -> Result<Vec<AccessRequest>, ContractCallError> {
        let count = self.request_count().await?;
        let mut requests = Vec::with_capacity(count as usize);
        for id in 1..=count {
            requests.push(self.request_details(id, viewer).await?);
        }
        Ok(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::HEDERA_TESTNET;

    fn client() -> Arc<EvmClient> {
        Arc::new(EvmClient::new(HEDERA_TESTNET, &"11".repeat(32)).unwrap())
    }

    #[test]
    fn wrapper_rejects_non_evm_contract_ids() {
        assert!(MarketplaceContract::new(client(), "0.0.5243021").is_err());
        assert!(
            MarketplaceContract::new(client(), "0xc02D72Aef09cf406940556Fdf458Be586f634451")
                .is_ok()
        );
    }

    #[test]
    fn add_data_source_signature_matches_contract_abi() {
        let params = ContractFunctionParams::new()
            .add_param("string", "name", ParamValue::Str("x".into()))
            .add_param("string", "dataType", ParamValue::Str("CSV".into()))
            .add_param("uint256", "size", ParamValue::Uint(10))
            .add_param("string", "storageLink", ParamValue::Str("enc".into()))
            .add_param("string", "metadataLink", ParamValue::Str("meta".into()))
            .add_param("uint256", "accessFee", ParamValue::Uint(5));

        assert_eq!(
            params.signature("addDataSource"),
            "addDataSource(string,string,uint256,string,string,uint256)"
        );
    }
}
