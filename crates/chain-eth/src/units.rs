//! Decimal amount strings to and from integer base units.

use alloy_primitives::utils::{format_units, parse_units};
use alloy_primitives::U256;

use crate::error::EthError;

/// Decimals of the native currency on every supported EVM chain.
pub const ETHER_DECIMALS: u8 = 18;

/// Parses a non-negative decimal string (`"1.5"`, `"0.001"`, `"42"`) into
/// base units with the given number of decimals.
///
/// More fractional digits than `decimals` is an error rather than a silent
/// truncation.
pub fn parse_amount(value: &str, decimals: u8) -> Result<U256, EthError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EthError::InvalidAmount("amount is empty".into()));
    }
    if !value.chars().all(|c| c.is_ascii_digit() || c == '.')
        || value.matches('.').count() > 1
        || !value.chars().any(|c| c.is_ascii_digit())
    {
        return Err(EthError::InvalidAmount(format!(
            "`{value}` is not a non-negative decimal number"
        )));
    }
    if let Some((_, fraction)) = value.split_once('.') {
        if fraction.len() > decimals as usize {
            return Err(EthError::InvalidAmount(format!(
                "`{value}` has more than {decimals} fractional digits"
            )));
        }
    }

    let parsed = parse_units(value, decimals)
        .map_err(|e| EthError::InvalidAmount(format!("`{value}`: {e}")))?;
    Ok(parsed.get_absolute())
}

/// Parses an amount of ether (18 decimals) into wei.
pub fn parse_ether(value: &str) -> Result<U256, EthError> {
    parse_amount(value, ETHER_DECIMALS)
}

/// Formats base units as a decimal string with trailing zeros trimmed,
/// keeping at least one fractional digit (`"1.0"`, `"0.00042"`).
pub fn format_amount(amount: U256, decimals: u8) -> Result<String, EthError> {
    let formatted =
        format_units(amount, decimals).map_err(|e| EthError::InvalidAmount(e.to_string()))?;
    Ok(trim_fraction(&formatted))
}

/// Formats wei as ether.
pub fn format_ether(amount: U256) -> Result<String, EthError> {
    format_amount(amount, ETHER_DECIMALS)
}

fn trim_fraction(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => format!("{formatted}.0"),
    }
}
