//! Account byte layout
//!
//! Curve accounts store the reserves as five consecutive little-endian u64:
//!
//! ```text
//! offset+0   virtual_sol_reserves
//! offset+8   virtual_token_reserves
//! offset+16  real_sol_reserves
//! offset+24  real_token_reserves
//! offset+32  initial_virtual_token_reserves
//! ```
//!
//! For bonding curve accounts the record starts right after the 8-byte
//! account discriminator. Bytes past the record are ignored.

use core::fmt;

use crate::ReserveCurve;

/// Size of the account discriminator prefix
pub const DISCRIMINATOR_LEN: usize = 8;

/// Size of the five-field reserve record
pub const RECORD_LEN: usize = 5 * 8;

/// Errors decoding account bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Account data ends before the record does
    TooShort { needed: usize, actual: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::TooShort { needed, actual } => write!(
                f,
                "account data too short: need {} bytes, got {}",
                needed, actual
            ),
        }
    }
}

/// Where the reserve record sits inside an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveLayout {
    pub offset: usize,
}

impl Default for ReserveLayout {
    fn default() -> Self {
        Self::BONDING_CURVE
    }
}

impl ReserveLayout {
    /// Bonding curve accounts: record follows the discriminator
    pub const BONDING_CURVE: ReserveLayout = ReserveLayout { offset: DISCRIMINATOR_LEN };

    /// Record at an arbitrary offset (e.g. after a longer pool header)
    pub const fn at(offset: usize) -> Self {
        Self { offset }
    }

    /// Minimum account length for this layout
    pub const fn min_len(&self) -> usize {
        self.offset + RECORD_LEN
    }

    pub fn decode(&self, data: &[u8]) -> Result<ReserveCurve, DecodeError> {
        let record = self.record(data)?;
        let field = |i: usize| {
            let mut word = [0u8; 8];
            word.copy_from_slice(&record[i * 8..i * 8 + 8]);
            u64::from_le_bytes(word)
        };

        Ok(ReserveCurve::new(field(0), field(1), field(2), field(3), field(4)))
    }

    /// Write `curve` into `data` at this layout's offset, leaving other bytes as-is
    pub fn encode_into(&self, curve: &ReserveCurve, data: &mut [u8]) -> Result<(), DecodeError> {
        let needed = self.min_len();
        let actual = data.len();
        let record = data
            .get_mut(self.offset..needed)
            .ok_or(DecodeError::TooShort { needed, actual })?;

        let fields = [
            curve.virtual_sol_reserves,
            curve.virtual_token_reserves,
            curve.real_sol_reserves,
            curve.real_token_reserves,
            curve.initial_virtual_token_reserves,
        ];
        for (chunk, value) in record.chunks_exact_mut(8).zip(fields) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        Ok(())
    }

    fn record<'a>(&self, data: &'a [u8]) -> Result<&'a [u8], DecodeError> {
        let needed = self.min_len();
        data.get(self.offset..needed).ok_or(DecodeError::TooShort {
            needed,
            actual: data.len(),
        })
    }
}

impl ReserveCurve {
    /// Decode a bonding curve account (record after the 8-byte discriminator)
    pub fn from_account_data(data: &[u8]) -> Result<Self, DecodeError> {
        ReserveLayout::BONDING_CURVE.decode(data)
    }
}
