//! User-facing quote errors

use curve_model::{CurveError, DecodeError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    #[error("trade too large for current pool depth: requested {requested}, pool can support less than {available}")]
    InsufficientLiquidity { requested: u64, available: u64 },

    #[error("invalid amount {amount}: enter a positive amount the pool can price")]
    InvalidAmount { amount: u64 },

    #[error("stale or corrupted pool data; re-fetch the curve account and retry")]
    StalePoolData,

    #[error("could not decode curve account: {0}")]
    Decode(DecodeError),
}

impl QuoteError {
    /// The cached curve for this pair must be dropped and re-read
    pub fn requires_refetch(&self) -> bool {
        matches!(self, QuoteError::StalePoolData | QuoteError::Decode(_))
    }
}

impl From<CurveError> for QuoteError {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::InvalidAmount { amount } => QuoteError::InvalidAmount { amount },
            CurveError::InsufficientLiquidity { requested, available } => {
                QuoteError::InsufficientLiquidity { requested, available }
            }
            CurveError::ArithmeticOverflow => QuoteError::StalePoolData,
        }
    }
}

impl From<DecodeError> for QuoteError {
    fn from(err: DecodeError) -> Self {
        QuoteError::Decode(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_quantity() {
        let err: QuoteError = CurveError::InsufficientLiquidity { requested: 900, available: 800 }.into();
        assert!(err.to_string().contains("too large for current pool depth"));
        assert!(err.to_string().contains("900"));

        let err: QuoteError = CurveError::InvalidAmount { amount: 0 }.into();
        assert!(err.to_string().starts_with("invalid amount 0"));
    }

    #[test]
    fn test_overflow_maps_to_refetch() {
        let err: QuoteError = CurveError::ArithmeticOverflow.into();
        assert_eq!(err, QuoteError::StalePoolData);
        assert!(err.requires_refetch());
        assert!(!QuoteError::InvalidAmount { amount: 1 }.requires_refetch());

        let err: QuoteError = DecodeError::TooShort { needed: 48, actual: 8 }.into();
        assert!(err.requires_refetch());
        assert!(err.to_string().contains("need 48 bytes"));
    }
}
