// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Blockchain integration for the Hedera EVM (via the JSON-RPC relay).
//!
//! This module provides:
//! - Typed, ordered contract parameter lists and dynamic ABI encoding
//! - A relay client that signs with the operator key and awaits receipts
//! - Wrappers for the DataAccessManagement and FeedbackManager contracts

pub mod client;
pub mod feedback;
pub mod marketplace;
pub mod params;
pub mod types;

pub use client::{CallOutcome, ContractCallError, EvmClient};
pub use feedback::FeedbackContract;
pub use marketplace::MarketplaceContract;
pub use params::{ContractFunctionParams, ContractParam, FunctionAbi, ParamError, ParamValue};
pub use types::*;
