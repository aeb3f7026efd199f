// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Ethos Network

//! Hedera network constants and amount helpers.

use alloy::primitives::U256;

/// Hedera network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: &'static str,
    /// EVM chain ID
    pub chain_id: u64,
    /// JSON-RPC relay endpoint
    pub rpc_url: &'static str,
    /// Mirror node REST endpoint
    pub mirror_url: &'static str,
    /// Block explorer URL
    pub explorer_url: &'static str,
}

/// Hedera mainnet configuration.
pub const HEDERA_MAINNET: NetworkConfig = NetworkConfig {
    name: "Hedera Mainnet",
    chain_id: 295,
    rpc_url: "https://mainnet.hashio.io/api",
    mirror_url: "https://mainnet.mirrornode.hedera.com",
    explorer_url: "https://hashscan.io/mainnet",
};

/// Hedera testnet configuration.
pub const HEDERA_TESTNET: NetworkConfig = NetworkConfig {
    name: "Hedera Testnet",
    chain_id: 296,
    rpc_url: "https://testnet.hashio.io/api",
    mirror_url: "https://testnet.mirrornode.hedera.com",
    explorer_url: "https://hashscan.io/testnet",
};

/// HBAR has 8 decimals in native (tinybar) accounting.
pub const TINYBAR_DECIMALS: u8 = 8;

/// `msg.value` on the relay is denominated in weibar (18 decimals).
pub const WEIBAR_DECIMALS: u8 = 18;

/// Gas limit for `addDataSource` calls.
pub const GAS_LIMIT_ADD_DATA_SOURCE: u64 = 800_000;
/// Gas limit for `requestAccess` calls.
pub const GAS_LIMIT_REQUEST_ACCESS: u64 = 300_000;
/// Gas limit for `processAccessRequest` calls.
pub const GAS_LIMIT_PROCESS_REQUEST: u64 = 300_000;
/// Gas limit for `createFeedback` calls.
pub const GAS_LIMIT_CREATE_FEEDBACK: u64 = 800_000;
/// Gas limit for `submitResponseAndUpdate` calls.
pub const GAS_LIMIT_FEEDBACK_RESPONSE: u64 = 800_000;

/// Parse a human-readable HBAR amount into its smallest unit.
///
/// # Arguments
/// * `amount` - Amount as a string (e.g., "1.5")
/// * `decimals` - [`TINYBAR_DECIMALS`] for on-chain fees, [`WEIBAR_DECIMALS`]
///   for `msg.value` on the relay
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, String> {
    let parts: Vec<&str> = amount.split('.').collect();

    if parts.len() > 2 {
        return Err("Invalid amount format".to_string());
    }

    let whole = parts[0]
        .parse::<u128>()
        .map_err(|_| "Invalid whole number".to_string())?;

    let decimal_part = if parts.len() == 2 {
        let dec_str = parts[1];
        if dec_str.len() > decimals as usize {
            return Err(format!("Too many decimal places (max {decimals})"));
        }
        let padded = format!("{:0<width$}", dec_str, width = decimals as usize);
        padded
            .parse::<u128>()
            .map_err(|_| "Invalid decimal".to_string())?
    } else {
        0u128
    };

    let multiplier = 10u128.pow(decimals as u32);
    let total = whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(decimal_part))
        .ok_or_else(|| "Amount overflow".to_string())?;

    Ok(U256::from(total))
}

/// Format a smallest-unit amount back to a human-readable string.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        if trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_hbar_to_tinybar() {
        assert_eq!(parse_amount("1", TINYBAR_DECIMALS).unwrap(), U256::from(100_000_000u64));
    }

    #[test]
    fn parse_fractional_hbar() {
        assert_eq!(
            parse_amount("1.5", TINYBAR_DECIMALS).unwrap(),
            U256::from(150_000_000u64)
        );
        assert_eq!(
            parse_amount("0.00000001", TINYBAR_DECIMALS).unwrap(),
            U256::from(1u64)
        );
    }

    #[test]
    fn parse_hbar_to_weibar_for_msg_value() {
        assert_eq!(
            parse_amount("1", WEIBAR_DECIMALS).unwrap(),
            U256::from(1_000_000_000_000_000_000u64)
        );
    }

    #[test]
    fn too_many_decimals_is_rejected() {
        assert!(parse_amount("1.000000001", TINYBAR_DECIMALS).is_err());
    }

    #[test]
    fn malformed_amounts_are_rejected() {
        assert!(parse_amount("1.2.3", TINYBAR_DECIMALS).is_err());
        assert!(parse_amount("abc", TINYBAR_DECIMALS).is_err());
    }

    #[test]
    fn format_round_trips() {
        let tinybar = parse_amount("12.25", TINYBAR_DECIMALS).unwrap();
        assert_eq!(format_amount(tinybar, TINYBAR_DECIMALS), "12.25");
        assert_eq!(format_amount(U256::ZERO, TINYBAR_DECIMALS), "0");
        assert_eq!(
            format_amount(U256::from(100_000_000u64), TINYBAR_DECIMALS),
            "1"
        );
    }
}
