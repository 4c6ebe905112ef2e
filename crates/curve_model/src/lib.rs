//! Curve Model - Exact integer pricing for virtual/real reserve bonding curves
//!
//! This crate holds the constant product pricing engine used to quote buys and
//! sells against a bonding curve account, apply them to the reserves, and guard
//! against reserve exhaustion. Every product of two `u64` values is taken in
//! `u128` and every narrowing back to `u64` is checked.
//!
//! The crate is `no_std` and performs no I/O: callers decode a curve from the
//! account bytes they fetched, price against it, and throw it away.

#![no_std]
#![forbid(unsafe_code)]

pub mod curve;
pub mod layout;
pub mod math;
pub mod slippage;

pub use curve::{BuyFill, ReserveCurve, SellFill};
pub use layout::{DecodeError, ReserveLayout};

use core::fmt;

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Decimals of curve-launched tokens
pub const TOKEN_DECIMALS: u32 = 6;

/// One whole token in raw units (10^TOKEN_DECIMALS)
pub const TOKEN_UNIT: u64 = 1_000_000;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u64 = 10_000;

/// Error types for curve pricing operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// Zero or out-of-range quantity
    InvalidAmount { amount: u64 },
    /// Trade would leave a zero or negative reserve
    InsufficientLiquidity { requested: u64, available: u64 },
    /// Wide product or narrowing step out of range (corrupt or stale reserves)
    ArithmeticOverflow,
}

impl CurveError {
    /// Whether retrying with a different amount against the same curve can succeed.
    ///
    /// `ArithmeticOverflow` means the reserve state itself is unusable and the
    /// caller has to re-read it from the ledger.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CurveError::ArithmeticOverflow)
    }
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveError::InvalidAmount { amount } => {
                write!(f, "invalid amount: {}", amount)
            }
            CurveError::InsufficientLiquidity { requested, available } => write!(
                f,
                "insufficient liquidity: requested {}, pool holds {}",
                requested, available
            ),
            CurveError::ArithmeticOverflow => f.write_str("arithmetic overflow"),
        }
    }
}
