//! Virtual/real reserve bonding curve
//!
//! Pricing runs on the virtual reserves (x·y=k), payouts are capped by the
//! real reserves:
//! - buy:  vsol' = vsol·vtok / (vtok - Δtok) + 1, cost = vsol' - vsol
//! - sell: share = Δtok·ivtok / vtok, payout = min(vsol·share / ivtok, rsol)
//! - spend: vtok' = vsol·vtok / (vsol + Δsol) + 1, out = min(vtok - vtok', rtok), at least 1
//!
//! The `+ 1` terms round against the trader. Sell payouts are scaled by the
//! immutable `initial_virtual_token_reserves` rather than the live token reserve.

use crate::math::{checked_add, checked_sub, div_floor, mul_div_floor, mul_u64, narrow};
use crate::CurveError;

/// Reserve state of one bonding curve account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReserveCurve {
    /// Synthetic SOL reserve shaping the price (lamports)
    pub virtual_sol_reserves: u64,
    /// Synthetic token reserve shaping the price (raw units)
    pub virtual_token_reserves: u64,
    /// SOL actually held by the curve; caps sell payouts
    pub real_sol_reserves: u64,
    /// Tokens actually held by the curve; caps buy fills
    pub real_token_reserves: u64,
    /// `virtual_token_reserves` at curve creation; sell scaling denominator
    pub initial_virtual_token_reserves: u64,
}

/// Outcome of a buy (or of a spend query)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuyFill {
    /// Tokens delivered (may be less than requested on a depleted curve)
    pub token_amount: u64,
    /// Lamports paid
    pub sol_amount: u64,
}

/// Outcome of a sell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SellFill {
    /// Tokens taken into the curve (always the full amount offered)
    pub token_amount: u64,
    /// Lamports paid out (clamped to the real SOL reserve)
    pub sol_amount: u64,
}

impl ReserveCurve {
    /// Build a curve from raw reserve quantities. No validation is done here;
    /// a zero token reserve is reported by the first operation that needs it.
    pub const fn new(
        virtual_sol_reserves: u64,
        virtual_token_reserves: u64,
        real_sol_reserves: u64,
        real_token_reserves: u64,
        initial_virtual_token_reserves: u64,
    ) -> Self {
        Self {
            virtual_sol_reserves,
            virtual_token_reserves,
            real_sol_reserves,
            real_token_reserves,
            initial_virtual_token_reserves,
        }
    }

    /// x·y over the virtual reserves
    #[inline]
    pub fn constant_product(&self) -> u128 {
        mul_u64(self.virtual_sol_reserves, self.virtual_token_reserves)
    }

    /// No real tokens left to sell to buyers
    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.real_token_reserves == 0
    }

    /// Lamports required to buy exactly `tokens_out` raw token units
    ///
    /// # Errors
    /// * `InvalidAmount` if `tokens_out == 0`
    /// * `InsufficientLiquidity` if `tokens_out >= virtual_token_reserves`
    /// * `ArithmeticOverflow` if the cost does not fit in u64
    pub fn quote_buy(&self, tokens_out: u64) -> Result<u64, CurveError> {
        if tokens_out == 0 {
            return Err(CurveError::InvalidAmount { amount: tokens_out });
        }
        if tokens_out >= self.virtual_token_reserves {
            return Err(CurveError::InsufficientLiquidity {
                requested: tokens_out,
                available: self.virtual_token_reserves,
            });
        }

        let new_virtual_token = (self.virtual_token_reserves - tokens_out) as u128;
        let new_virtual_sol = div_floor(self.constant_product(), new_virtual_token)? + 1;

        // new_virtual_sol > vsol because new_virtual_token < vtok
        let sol_required = new_virtual_sol
            .checked_sub(self.virtual_sol_reserves as u128)
            .ok_or(CurveError::ArithmeticOverflow)?;
        narrow(sol_required)
    }

    /// Lamports paid out for selling `tokens_in` raw token units
    ///
    /// The result is silently clamped to `real_sol_reserves`.
    ///
    /// # Errors
    /// * `InvalidAmount` if `tokens_in == 0` or `tokens_in > virtual_token_reserves`
    /// * `ArithmeticOverflow` if `initial_virtual_token_reserves == 0`
    pub fn quote_sell(&self, tokens_in: u64) -> Result<u64, CurveError> {
        if tokens_in == 0 || tokens_in > self.virtual_token_reserves {
            return Err(CurveError::InvalidAmount { amount: tokens_in });
        }

        let scale = self.initial_virtual_token_reserves;
        // tokens_in <= vtok, so the proportion never exceeds scale
        let sell_proportion = narrow(mul_div_floor(tokens_in, scale, self.virtual_token_reserves)?)?;
        let sol_out = narrow(mul_div_floor(self.virtual_sol_reserves, sell_proportion, scale)?)?;

        Ok(sol_out.min(self.real_sol_reserves))
    }

    /// Buy up to `tokens_requested`, filling at most `real_token_reserves`
    ///
    /// Reserves are updated only if every step succeeds. A depleted curve fills
    /// nothing and is left unchanged.
    pub fn apply_buy(&mut self, tokens_requested: u64) -> Result<BuyFill, CurveError> {
        if tokens_requested == 0 {
            return Err(CurveError::InvalidAmount { amount: tokens_requested });
        }

        let token_amount = tokens_requested.min(self.real_token_reserves);
        if token_amount == 0 {
            return Ok(BuyFill::default());
        }
        let sol_amount = self.quote_buy(token_amount)?;

        let next = ReserveCurve {
            virtual_sol_reserves: checked_add(self.virtual_sol_reserves, sol_amount)?,
            virtual_token_reserves: checked_sub(self.virtual_token_reserves, token_amount)?,
            real_sol_reserves: checked_add(self.real_sol_reserves, sol_amount)?,
            real_token_reserves: checked_sub(self.real_token_reserves, token_amount)?,
            initial_virtual_token_reserves: self.initial_virtual_token_reserves,
        };
        *self = next;

        Ok(BuyFill { token_amount, sol_amount })
    }

    /// Sell `tokens_in`; the full amount enters the curve, the payout is clamped
    ///
    /// Reserves are updated only if every step succeeds.
    pub fn apply_sell(&mut self, tokens_in: u64) -> Result<SellFill, CurveError> {
        let sol_amount = self.quote_sell(tokens_in)?;

        let next = ReserveCurve {
            virtual_sol_reserves: checked_sub(self.virtual_sol_reserves, sol_amount)?,
            virtual_token_reserves: checked_add(self.virtual_token_reserves, tokens_in)?,
            real_sol_reserves: checked_sub(self.real_sol_reserves, sol_amount)?,
            real_token_reserves: checked_add(self.real_token_reserves, tokens_in)?,
            initial_virtual_token_reserves: self.initial_virtual_token_reserves,
        };
        *self = next;

        Ok(SellFill { token_amount: tokens_in, sol_amount })
    }

    /// Tokens obtainable for spending exactly `sol_in` lamports (pure query)
    ///
    /// Clamped to `real_token_reserves`; a positive spend never quotes zero
    /// tokens. Pair with [`apply_buy`](Self::apply_buy) to execute.
    pub fn tokens_for_sol(&self, sol_in: u64) -> Result<BuyFill, CurveError> {
        if sol_in == 0 {
            return Ok(BuyFill::default());
        }

        let new_virtual_sol = self.virtual_sol_reserves as u128 + sol_in as u128;
        let new_virtual_token = div_floor(self.constant_product(), new_virtual_sol)? + 1;

        let tokens_out = (self.virtual_token_reserves as u128)
            .checked_sub(new_virtual_token)
            .ok_or(CurveError::InsufficientLiquidity {
                requested: sol_in,
                available: self.virtual_token_reserves,
            })?;
        let tokens_out = narrow(tokens_out)?.min(self.real_token_reserves);

        Ok(BuyFill {
            token_amount: tokens_out.max(1),
            sol_amount: sol_in,
        })
    }

    /// Lamports to buy `unit` raw token units at the current state
    ///
    /// With `unit = TOKEN_UNIT` this is the per-token price charts display.
    pub fn spot_price(&self, unit: u64) -> Result<u64, CurveError> {
        self.quote_buy(unit)
    }
}
