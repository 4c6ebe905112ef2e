//! Wide integer helpers
//!
//! Products of two `u64` are taken in `u128` and cannot overflow. Divisions and
//! narrowing back to `u64` are checked and report `ArithmeticOverflow`.

use crate::CurveError;

/// Multiply two u64 values and return u128
#[inline]
pub fn mul_u64(a: u64, b: u64) -> u128 {
    (a as u128) * (b as u128)
}

/// Divide u128 by u128, rounding down
#[inline]
pub fn div_floor(numerator: u128, denominator: u128) -> Result<u128, CurveError> {
    numerator
        .checked_div(denominator)
        .ok_or(CurveError::ArithmeticOverflow)
}

/// (a * b) / d with the product taken in u128, rounding down
#[inline]
pub fn mul_div_floor(a: u64, b: u64, d: u64) -> Result<u128, CurveError> {
    div_floor(mul_u64(a, b), d as u128)
}

/// Narrow a u128 back to u64
#[inline]
pub fn narrow(value: u128) -> Result<u64, CurveError> {
    u64::try_from(value).map_err(|_| CurveError::ArithmeticOverflow)
}

#[inline]
pub fn checked_add(a: u64, b: u64) -> Result<u64, CurveError> {
    a.checked_add(b).ok_or(CurveError::ArithmeticOverflow)
}

#[inline]
pub fn checked_sub(a: u64, b: u64) -> Result<u64, CurveError> {
    a.checked_sub(b).ok_or(CurveError::ArithmeticOverflow)
}


// ═══════════════════════════════════════════════════════════════
// KANI FORMAL VERIFICATION PROOFS
// ═══════════════════════════════════════════════════════════════

#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// W1: mul_div_floor never panics and agrees with the wide quotient
    #[kani::proof]
    fn w1_mul_div_total() {
        let a: u64 = kani::any();
        let b: u64 = kani::any();
        let d: u64 = kani::any();

        match mul_div_floor(a, b, d) {
            Ok(q) => {
                assert!(d != 0, "W1: division by zero must be reported");
                assert!(q * (d as u128) <= mul_u64(a, b), "W1: quotient rounds down");
            }
            Err(e) => {
                assert!(d == 0, "W1: only zero divisor fails");
                assert_eq!(e, CurveError::ArithmeticOverflow);
            }
        }
    }

    /// W2: narrow is lossless when it succeeds
    #[kani::proof]
    fn w2_narrow_lossless() {
        let v: u128 = kani::any();
        if let Ok(n) = narrow(v) {
            assert_eq!(n as u128, v, "W2: narrowing must not truncate");
        } else {
            assert!(v > u64::MAX as u128);
        }
    }
}
