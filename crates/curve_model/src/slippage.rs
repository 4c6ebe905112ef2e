//! Slippage bounds on quoted amounts (basis points)

use crate::math::{mul_u64, narrow};
use crate::{CurveError, BPS_SCALE};

/// Default tolerance: 0.5%
pub const DEFAULT_SLIPPAGE_BPS: u64 = 50;

fn check_bps(slippage_bps: u64) -> Result<(), CurveError> {
    if slippage_bps > BPS_SCALE {
        return Err(CurveError::InvalidAmount { amount: slippage_bps });
    }
    Ok(())
}

/// Most a buyer should be willing to pay for a quoted cost, rounded up
pub fn max_sol_cost(quoted: u64, slippage_bps: u64) -> Result<u64, CurveError> {
    check_bps(slippage_bps)?;
    let bump = mul_u64(quoted, slippage_bps).div_ceil(BPS_SCALE as u128);
    narrow(quoted as u128 + bump)
}

/// Least a seller should accept for a quoted payout, rounded down
pub fn min_sol_output(quoted: u64, slippage_bps: u64) -> Result<u64, CurveError> {
    check_bps(slippage_bps)?;
    let keep = BPS_SCALE - slippage_bps;
    narrow(mul_u64(quoted, keep) / BPS_SCALE as u128)
}
