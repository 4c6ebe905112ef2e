//! Decimal amount parsing and formatting
//!
//! Amounts typed by the user ("1.5" SOL, "1000" tokens) are converted to raw
//! integer units without going through floating point.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitsError {
    #[error("not a decimal amount: {0:?}")]
    Malformed(String),
    #[error("{input:?} has more than {decimals} decimal places")]
    TooPrecise { input: String, decimals: u32 },
    #[error("{0:?} is too large")]
    Overflow(String),
}

/// Parse `"12.345"` into raw units with `decimals` fractional digits
pub fn parse_units(input: &str, decimals: u32) -> Result<u64, UnitsError> {
    let trimmed = input.trim().replace('_', "");
    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed.as_str(), ""),
    };

    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !digits_only(whole) || !digits_only(frac) {
        return Err(UnitsError::Malformed(input.to_string()));
    }
    if frac.len() > decimals as usize {
        return Err(UnitsError::TooPrecise { input: input.to_string(), decimals });
    }

    let overflow = || UnitsError::Overflow(input.to_string());
    let scale = 10u64.checked_pow(decimals).ok_or_else(overflow)?;
    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| overflow())? };
    let frac_raw: u64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = decimals as usize);
        padded.parse().map_err(|_| overflow())?
    };

    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac_raw))
        .ok_or_else(overflow)
}

/// Format raw units as a fixed-point decimal string
pub fn format_units(raw: u64, decimals: u32) -> String {
    if decimals == 0 {
        return raw.to_string();
    }
    let width = decimals as usize;
    let digits = format!("{:0>pad$}", raw, pad = width + 1);
    let (whole, frac) = digits.split_at(digits.len() - width);
    format!("{}.{}", whole, frac)
}

/// Format lamports as SOL
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / curve_model::LAMPORTS_PER_SOL as f64
}
