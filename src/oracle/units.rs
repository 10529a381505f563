// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! 18-decimal fixed-point conversions and minimal-width hex encoding.
//!
//! Trait values travel as decimal strings (`"1.5"`) but are attested and
//! compared on-chain as `uint256` values scaled by 10^18. The formatting
//! direction mirrors the chain convention of always showing at least one
//! fractional digit (`"1.0"`, not `"1"`).

use alloy::primitives::U256;

const DECIMALS: usize = 18;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UnitError {
    #[error("'{0}' is not a valid decimal value")]
    Invalid(String),

    #[error("'{0}' has more than 18 decimal places")]
    TooManyDecimals(String),

    #[error("'{0}' overflows uint256")]
    Overflow(String),
}

fn scale() -> U256 {
    U256::from(10u64).pow(U256::from(DECIMALS as u64))
}

/// Parse a decimal string into an 18-decimal fixed-point `U256`.
///
/// Accepts `"1"`, `"1.5"`, `".5"`; rejects signs, exponents, and more
/// than 18 fractional digits.
pub fn parse_units(value: &str) -> Result<U256, UnitError> {
    let trimmed = value.trim();
    let (whole, frac) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(UnitError::Invalid(value.to_string()));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(UnitError::Invalid(value.to_string()));
    }
    if frac.len() > DECIMALS {
        return Err(UnitError::TooManyDecimals(value.to_string()));
    }

    let whole_part = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| UnitError::Overflow(value.to_string()))?
    };

    let frac_part = if frac.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{:0<width$}", frac, width = DECIMALS);
        U256::from_str_radix(&padded, 10).map_err(|_| UnitError::Overflow(value.to_string()))?
    };

    whole_part
        .checked_mul(scale())
        .and_then(|scaled| scaled.checked_add(frac_part))
        .ok_or_else(|| UnitError::Overflow(value.to_string()))
}

/// Format an 18-decimal fixed-point `U256` as a decimal string with at
/// least one fractional digit.
pub fn format_units(value: U256) -> String {
    let whole = value / scale();
    let remainder = value % scale();

    if remainder.is_zero() {
        return format!("{whole}.0");
    }

    let frac = format!("{:0>width$}", remainder, width = DECIMALS);
    format!("{whole}.{}", frac.trim_end_matches('0'))
}

/// Hex-encode a `U256` with minimal byte width: `0x`-prefixed, even
/// length, no leading zero bytes (`0x00` for zero).
pub fn hexlify(value: U256) -> String {
    if value.is_zero() {
        return "0x00".to_string();
    }

    let bytes = value.to_be_bytes::<32>();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(31);
    format!("0x{}", alloy::hex::encode(&bytes[first..]))
}
