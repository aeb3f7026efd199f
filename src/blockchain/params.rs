// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Ordered, typed contract call parameters.
//!
//! Call sites accumulate `(type, name, value)` triples with a chainable
//! builder; insertion order is the positional order of the ABI encoding. By
//! default nothing is checked against the target function and a wrong type
//! tag fails at encoding time, not at build time, matching how permissive
//! call sites have always behaved. Callers that hold a [`FunctionAbi`]
//! descriptor can opt into build-time validation instead.

use std::str::FromStr;

use alloy::dyn_abi::{DynSolValue, JsonAbiExt};
use alloy::json_abi::Function;
use alloy::primitives::{Address, U256};

/// Parameter build or encoding failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("function {function} expects {expected} parameters, got {actual}")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("parameter `{name}` declares type {declared} but {expected} is required")]
    TypeMismatch {
        name: String,
        declared: String,
        expected: String,
    },

    #[error("parameter `{name}`: value does not fit declared type {declared}")]
    ValueMismatch { name: String, declared: String },

    #[error("invalid function signature `{signature}`: {reason}")]
    BadSignature { signature: String, reason: String },

    #[error("parameter `{name}`: invalid address: {reason}")]
    BadAddress { name: String, reason: String },
}

/// A contract call argument value, tagged by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Uint(u128),
    Bool(bool),
    Address(String),
    Bytes(Vec<u8>),
}

/// One `(type, name, value)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractParam {
    /// Solidity-style type tag, e.g. `uint256`, `string`, `bool`.
    pub type_tag: String,
    /// Parameter name; informational only, not part of the encoding.
    pub name: String,
    pub value: ParamValue,
}

/// Known shape of one contract function, for opt-in strict validation.
#[derive(Debug, Clone)]
pub struct FunctionAbi {
    pub name: &'static str,
    pub param_types: &'static [&'static str],
}

/// Ordered parameter list for one contract invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractFunctionParams {
    params: Vec<ContractParam>,
}

impl ContractFunctionParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. Chainable; insertion order is encoding order.
    pub fn add_param(
        mut self,
        type_tag: impl Into<String>,
        name: impl Into<String>,
        value: ParamValue,
    ) -> Self {
        self.params.push(ContractParam {
            type_tag: type_tag.into(),
            name: name.into(),
            value,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn params(&self) -> &[ContractParam] {
        &self.params
    }

    /// Render the canonical signature for a function taking these params,
    /// e.g. `addDataSource(string,string,uint256,string,string,uint256)`.
    pub fn signature(&self, function_name: &str) -> String {
        let types: Vec<&str> = self.params.iter().map(|p| p.type_tag.as_str()).collect();
        format!("{}({})", function_name, types.join(","))
    }

    /// Opt-in strict check against a known function descriptor.
    ///
    /// Rejects arity and type tag mismatches before anything is encoded or
    /// sent. The permissive default path never calls this.
    pub fn validate_against(&self, abi: &FunctionAbi) -> Result<(), ParamError> {
        if self.params.len() != abi.param_types.len() {
            return Err(ParamError::ArityMismatch {
                function: abi.name.to_string(),
                expected: abi.param_types.len(),
                actual: self.params.len(),
            });
        }
        for (param, expected) in self.params.iter().zip(abi.param_types) {
            if param.type_tag != *expected {
                return Err(ParamError::TypeMismatch {
                    name: param.name.clone(),
                    declared: param.type_tag.clone(),
                    expected: expected.to_string(),
                });
            }
        }
        Ok(())
    }

    /// ABI-encode calldata (selector + arguments) for the given function.
    pub fn encode_input(&self, function_name: &str) -> Result<Vec<u8>, ParamError> {
        let signature = self.signature(function_name);
        let function = Function::parse(&signature).map_err(|e| ParamError::BadSignature {
            signature: signature.clone(),
            reason: e.to_string(),
        })?;

        let values = self
            .params
            .iter()
            .map(|p| p.to_sol_value())
            .collect::<Result<Vec<_>, _>>()?;

        function
            .abi_encode_input(&values)
            .map_err(|e| ParamError::BadSignature {
                signature,
                reason: e.to_string(),
            })
    }
}

impl ContractParam {
    /// Map the tagged value onto the ABI word for its declared type.
    fn to_sol_value(&self) -> Result<DynSolValue, ParamError> {
        let tag = self.type_tag.as_str();
        match (&self.value, tag) {
            (ParamValue::Str(s), "string") => Ok(DynSolValue::String(s.clone())),
            (ParamValue::Bool(b), "bool") => Ok(DynSolValue::Bool(*b)),
            (ParamValue::Bytes(b), "bytes") => Ok(DynSolValue::Bytes(b.clone())),
            (ParamValue::Uint(n), _) if tag.starts_with("uint") => {
                let bits = tag[4..].parse::<usize>().unwrap_or(256);
                Ok(DynSolValue::Uint(U256::from(*n), bits))
            }
            (ParamValue::Address(raw), "address") => {
                let address =
                    Address::from_str(raw).map_err(|e| ParamError::BadAddress {
                        name: self.name.clone(),
                        reason: e.to_string(),
                    })?;
                Ok(DynSolValue::Address(address))
            }
            _ => Err(ParamError::ValueMismatch {
                name: self.name.clone(),
                declared: self.type_tag.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_is_preserved() {
        let params = ContractFunctionParams::new()
            .add_param("string", "name", ParamValue::Str("x".into()))
            .add_param("uint256", "fee", ParamValue::Uint(5));

        assert_eq!(params.len(), 2);
        assert_eq!(params.params()[0].type_tag, "string");
        assert_eq!(params.params()[0].name, "name");
        assert_eq!(params.params()[1].type_tag, "uint256");
        assert_eq!(params.params()[1].value, ParamValue::Uint(5));
    }

    #[test]
    fn signature_renders_in_order() {
        let params = ContractFunctionParams::new()
            .add_param("uint256", "dataSourceId", ParamValue::Uint(7))
            .add_param("string", "purpose", ParamValue::Str("analysis".into()));

        assert_eq!(
            params.signature("requestAccess"),
            "requestAccess(uint256,string)"
        );
    }

    #[test]
    fn permissive_default_accepts_unknown_tags() {
        // No ABI validation happens at build time; a bogus tag only fails
        // once encoding is attempted.
        let params = ContractFunctionParams::new().add_param(
            "uint73",
            "odd",
            ParamValue::Str("not a number".into()),
        );
        assert_eq!(params.len(), 1);
        assert!(params.encode_input("f").is_err());
    }

    #[test]
    fn strict_mode_rejects_arity_mismatch() {
        let abi = FunctionAbi {
            name: "processAccessRequest",
            param_types: &["uint256", "bool"],
        };
        let params = ContractFunctionParams::new().add_param(
            "uint256",
            "requestId",
            ParamValue::Uint(1),
        );

        assert_eq!(
            params.validate_against(&abi),
            Err(ParamError::ArityMismatch {
                function: "processAccessRequest".into(),
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn strict_mode_rejects_type_mismatch() {
        let abi = FunctionAbi {
            name: "processAccessRequest",
            param_types: &["uint256", "bool"],
        };
        let params = ContractFunctionParams::new()
            .add_param("uint256", "requestId", ParamValue::Uint(1))
            .add_param("string", "approved", ParamValue::Str("yes".into()));

        assert!(matches!(
            params.validate_against(&abi),
            Err(ParamError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn strict_mode_accepts_matching_params() {
        let abi = FunctionAbi {
            name: "processAccessRequest",
            param_types: &["uint256", "bool"],
        };
        let params = ContractFunctionParams::new()
            .add_param("uint256", "requestId", ParamValue::Uint(1))
            .add_param("bool", "approved", ParamValue::Bool(true));

        assert!(params.validate_against(&abi).is_ok());
    }

    #[test]
    fn encode_input_starts_with_selector() {
        let params = ContractFunctionParams::new()
            .add_param("uint256", "requestId", ParamValue::Uint(3))
            .add_param("bool", "approved", ParamValue::Bool(true));

        let data = params.encode_input("processAccessRequest").unwrap();
        // 4-byte selector + two 32-byte words
        assert_eq!(data.len(), 4 + 64);

        let expected_selector =
            &alloy::primitives::keccak256("processAccessRequest(uint256,bool)".as_bytes())[..4];
        assert_eq!(&data[..4], expected_selector);
    }

    #[test]
    fn value_that_does_not_fit_declared_tag_fails_at_encode_time() {
        let params = ContractFunctionParams::new().add_param(
            "uint256",
            "fee",
            ParamValue::Str("five".into()),
        );
        assert!(matches!(
            params.encode_input("setFee"),
            Err(ParamError::ValueMismatch { .. })
        ));
    }

    #[test]
    fn address_values_are_parsed() {
        let params = ContractFunctionParams::new().add_param(
            "address",
            "owner",
            ParamValue::Address("0xc02D72Aef09cf406940556Fdf458Be586f634451".into()),
        );
        assert!(params.encode_input("setOwner").is_ok());

        let bad = ContractFunctionParams::new().add_param(
            "address",
            "owner",
            ParamValue::Address("not-an-address".into()),
        );
        assert!(matches!(
            bad.encode_input("setOwner"),
            Err(ParamError::BadAddress { .. })
        ));
    }
}
