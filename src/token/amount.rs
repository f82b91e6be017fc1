//! Token amounts in smallest units.
//!
//! Amounts are `u128` base units; one whole token is `10^decimals` units.
//! Parsing and formatting are exact: no floating point, no rounding.

use thiserror::Error;

/// Token amount in smallest units.
pub type Amount = u128;

/// Largest supported `decimals` value (10^38 still fits in a u128).
pub const MAX_DECIMALS: u8 = 38;

/// Amount parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Invalid amount '{0}'")]
    Invalid(String),

    #[error("Amount '{input}' has more than {decimals} fractional digits")]
    TooPrecise { input: String, decimals: u8 },

    #[error("Amount '{0}' overflows")]
    Overflow(String),

    #[error("Unsupported decimals: {0}")]
    UnsupportedDecimals(u8),
}

/// `10^decimals`.
pub fn unit(decimals: u8) -> Result<Amount, AmountError> {
    if decimals > MAX_DECIMALS {
        return Err(AmountError::UnsupportedDecimals(decimals));
    }
    Ok(10u128.pow(decimals as u32))
}

/// Convert whole tokens to smallest units.
pub fn whole_tokens(tokens: u64, decimals: u8) -> Result<Amount, AmountError> {
    (tokens as u128)
        .checked_mul(unit(decimals)?)
        .ok_or_else(|| AmountError::Overflow(tokens.to_string()))
}

/// Parse a decimal token string (`"1000"`, `"0.5"`) into smallest units.
pub fn parse_amount(input: &str, decimals: u8) -> Result<Amount, AmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, fraction) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(AmountError::Invalid(input.to_string()));
    }
    if fraction.len() > decimals as usize {
        return Err(AmountError::TooPrecise {
            input: input.to_string(),
            decimals,
        });
    }

    let overflow = || AmountError::Overflow(input.to_string());

    let whole_units = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .map_err(|_| overflow())?
            .checked_mul(unit(decimals)?)
            .ok_or_else(overflow)?
    };

    let fraction_units = if fraction.is_empty() {
        0
    } else {
        let scale = unit(decimals - fraction.len() as u8)?;
        fraction
            .parse::<u128>()
            .map_err(|_| overflow())?
            .checked_mul(scale)
            .ok_or_else(overflow)?
    };

    whole_units.checked_add(fraction_units).ok_or_else(overflow)
}

/// Format smallest units as a decimal token string, trimming trailing zeros.
pub fn format_amount(amount: Amount, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }
    let Ok(scale) = unit(decimals) else {
        return amount.to_string();
    };

    let whole = amount / scale;
    let fraction = amount % scale;
    if fraction == 0 {
        return whole.to_string();
    }

    let padded = format!("{:0width$}", fraction, width = decimals as usize);
    format!("{}.{}", whole, padded.trim_end_matches('0'))
}
