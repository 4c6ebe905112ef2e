//! Property suite for the reserve curve
//!
//! Run with: cargo test -p curve_model
//! Increase cases: PROPTEST_CASES=10000 cargo test -p curve_model
//!
//! Covers:
//! - spend/buy round trip and affordability
//! - buy cost monotonicity
//! - reserve non-negativity across trade sequences
//! - real reserve clamps and the spend floor
//! - "no mutation on error"

use curve_model::*;
use proptest::prelude::*;

// ============================================================================
// STRATEGIES
// ============================================================================

/// Curves in the range live accounts occupy: up to ~1M SOL virtual, up to
/// ~1e13 whole 6-decimal tokens virtual, real reserves within the virtual ones.
fn curve_strategy() -> impl Strategy<Value = ReserveCurve> {
    (1u64..1_000_000 * LAMPORTS_PER_SOL, 2u64..10_000_000_000_000_000_000)
        .prop_flat_map(|(vsol, vtok)| {
            (Just(vsol), Just(vtok), 0..=vsol, 0..=vtok, Just(vtok))
        })
        .prop_map(|(vsol, vtok, rsol, rtok, ivtok)| ReserveCurve::new(vsol, vtok, rsol, rtok, ivtok))
}

/// Curves where one raw token unit costs at least a lamport
fn pricey_curve_strategy() -> impl Strategy<Value = ReserveCurve> {
    (1_000u64..1_000_000_000, 1u64..1_000_000)
        .prop_map(|(vtok, price)| {
            let vsol = vtok.saturating_mul(price);
            ReserveCurve::new(vsol, vtok, 0, vtok, vtok)
        })
}

#[derive(Debug, Clone, Copy)]
enum Trade {
    Buy(u64),
    Sell(u64),
}

fn trade_strategy() -> impl Strategy<Value = Trade> {
    prop_oneof![
        (1u64..1_000_000_000_000_000).prop_map(Trade::Buy),
        (1u64..1_000_000_000_000_000).prop_map(Trade::Sell),
    ]
}

// ============================================================================
// ROUND TRIP
// ============================================================================

proptest! {
    #[test]
    fn spend_never_returns_fewer_tokens_than_bought(curve in curve_strategy(), frac in 1u64..1_000) {
        let tokens_out = (curve.virtual_token_reserves / 1_000).saturating_mul(frac).max(1);
        prop_assume!(tokens_out < curve.virtual_token_reserves);

        let curve = ReserveCurve { real_token_reserves: curve.virtual_token_reserves, ..curve };
        if let Ok(cost) = curve.quote_buy(tokens_out) {
            let fill = curve.tokens_for_sol(cost).unwrap();
            prop_assert!(fill.token_amount >= tokens_out,
                "spend({}) gave {} < {}", cost, fill.token_amount, tokens_out);
            prop_assert_eq!(fill.sol_amount, cost);
        }
    }

    #[test]
    fn round_trip_exact_when_units_cost_a_lamport(curve in pricey_curve_strategy(), frac in 1u64..1_000) {
        let tokens_out = (curve.virtual_token_reserves / 1_000).saturating_mul(frac).max(1);
        prop_assume!(tokens_out < curve.virtual_token_reserves);

        let cost = curve.quote_buy(tokens_out).unwrap();
        let fill = curve.tokens_for_sol(cost).unwrap();

        prop_assert!(fill.token_amount >= tokens_out);
        prop_assert!(fill.token_amount - tokens_out <= 1,
            "bought {} for {} but spend quotes {}", tokens_out, cost, fill.token_amount);
    }

    #[test]
    fn spend_quote_is_affordable(curve in curve_strategy(), sol_in in 1u64..100 * LAMPORTS_PER_SOL) {
        let fill = curve.tokens_for_sol(sol_in).unwrap();
        let unclamped = fill.token_amount < curve.real_token_reserves;

        // The floor can quote a unit that costs more than sol_in
        if unclamped && fill.token_amount > 1 {
            let cost = curve.quote_buy(fill.token_amount).unwrap();
            prop_assert!(cost <= sol_in, "{} tokens cost {} > {}", fill.token_amount, cost, sol_in);
        }
    }
}

// ============================================================================
// MONOTONICITY
// ============================================================================

proptest! {
    #[test]
    fn buying_more_never_costs_less(curve in curve_strategy(), a in 1u64..u64::MAX, b in 1u64..u64::MAX) {
        let vtok = curve.virtual_token_reserves;
        let (a, b) = (a % vtok, b % vtok);
        prop_assume!(a > 0 && a < b);

        if let (Ok(cost_a), Ok(cost_b)) = (curve.quote_buy(a), curve.quote_buy(b)) {
            prop_assert!(cost_a <= cost_b);
        }
    }

    #[test]
    fn buying_more_costs_more_when_units_cost_a_lamport(curve in pricey_curve_strategy(), a in 1u64..u64::MAX, b in 1u64..u64::MAX) {
        // stay within half the reserve so costs fit in u64
        let half = curve.virtual_token_reserves / 2;
        let (a, b) = (a % half, b % half);
        prop_assume!(a > 0 && a < b);

        let cost_a = curve.quote_buy(a).unwrap();
        let cost_b = curve.quote_buy(b).unwrap();
        prop_assert!(cost_a < cost_b, "quote_buy({})={} !< quote_buy({})={}", a, cost_a, b, cost_b);
    }
}

// ============================================================================
// STATE MACHINE
// ============================================================================

proptest! {
    #[test]
    fn trade_sequences_keep_reserves_consistent(
        curve in curve_strategy(),
        trades in prop::collection::vec(trade_strategy(), 1..32),
    ) {
        let mut curve = curve;
        for trade in trades {
            let before = curve;
            let result = match trade {
                Trade::Buy(n) => curve.apply_buy(n).map(|f| (f.token_amount, f.sol_amount)),
                Trade::Sell(n) => curve.apply_sell(n).map(|f| (f.token_amount, f.sol_amount)),
            };

            match result {
                Ok((tokens, sol)) => match trade {
                    Trade::Buy(_) => {
                        prop_assert!(tokens <= before.real_token_reserves);
                        prop_assert_eq!(curve.real_token_reserves, before.real_token_reserves - tokens);
                        prop_assert_eq!(curve.virtual_token_reserves, before.virtual_token_reserves - tokens);
                        prop_assert_eq!(curve.real_sol_reserves, before.real_sol_reserves + sol);
                        prop_assert_eq!(curve.virtual_sol_reserves, before.virtual_sol_reserves + sol);
                    }
                    Trade::Sell(n) => {
                        prop_assert_eq!(tokens, n);
                        prop_assert!(sol <= before.real_sol_reserves);
                        prop_assert_eq!(curve.real_sol_reserves, before.real_sol_reserves - sol);
                        prop_assert_eq!(curve.virtual_sol_reserves, before.virtual_sol_reserves - sol);
                    }
                },
                Err(_) => {
                    prop_assert_eq!(curve, before, "state changed on error");
                }
            }

            prop_assert_eq!(curve.initial_virtual_token_reserves, before.initial_virtual_token_reserves);
            // virtual side only reaches zero if it started there
            prop_assert!(curve.virtual_token_reserves > 0);
        }
    }

    #[test]
    fn buy_beyond_real_reserve_drains_it_exactly(curve in curve_strategy(), extra in 1u64..1_000_000) {
        prop_assume!(curve.real_token_reserves > 0);
        prop_assume!(curve.real_token_reserves < curve.virtual_token_reserves);

        let mut curve = curve;
        let available = curve.real_token_reserves;
        if let Ok(fill) = curve.apply_buy(available.saturating_add(extra)) {
            prop_assert_eq!(fill.token_amount, available);
            prop_assert_eq!(curve.real_token_reserves, 0);
            prop_assert!(curve.is_depleted());
        }
    }

    #[test]
    fn sell_payout_never_exceeds_real_sol(curve in curve_strategy(), tokens in 1u64..u64::MAX) {
        let tokens = tokens % curve.virtual_token_reserves + 1;
        let payout = curve.quote_sell(tokens).unwrap();
        prop_assert!(payout <= curve.real_sol_reserves);
        prop_assert!(payout <= curve.virtual_sol_reserves);
    }
}

// ============================================================================
// FLOOR AND ERROR CASES
// ============================================================================

proptest! {
    #[test]
    fn one_lamport_always_buys_something(curve in curve_strategy()) {
        prop_assume!(curve.real_token_reserves > 0);
        let fill = curve.tokens_for_sol(1).unwrap();
        prop_assert!(fill.token_amount >= 1);
        prop_assert!(fill.token_amount <= curve.real_token_reserves);
    }

    #[test]
    fn selling_past_virtual_reserve_is_invalid(curve in curve_strategy(), over in 1u64..1_000) {
        let tokens = curve.virtual_token_reserves.saturating_add(over);
        prop_assume!(tokens > curve.virtual_token_reserves);
        prop_assert_eq!(curve.quote_sell(tokens), Err(CurveError::InvalidAmount { amount: tokens }));
    }

    #[test]
    fn buying_whole_virtual_reserve_is_insufficient_liquidity(curve in curve_strategy()) {
        let vtok = curve.virtual_token_reserves;
        let is_insufficient = matches!(
            curve.quote_buy(vtok),
            Err(CurveError::InsufficientLiquidity { .. })
        );
        prop_assert!(is_insufficient);
    }

    #[test]
    fn operations_never_panic(
        vsol in any::<u64>(), vtok in any::<u64>(), rsol in any::<u64>(),
        rtok in any::<u64>(), ivtok in any::<u64>(), amount in any::<u64>(),
    ) {
        let curve = ReserveCurve::new(vsol, vtok, rsol, rtok, ivtok);
        let _ = curve.quote_buy(amount);
        let _ = curve.quote_sell(amount);
        let _ = curve.tokens_for_sol(amount);
        let mut bought = curve;
        let _ = bought.apply_buy(amount);
        let mut sold = curve;
        let _ = sold.apply_sell(amount);
    }
}

// ============================================================================
// PINNED SCENARIO
// ============================================================================

#[test]
fn launch_curve_buy_1000_tokens() {
    let mut curve = ReserveCurve::new(
        30_000_000_000,
        1_000_000_000_000_000,
        0,
        800_000_000_000_000,
        1_000_000_000_000_000,
    );

    let cost = curve.quote_buy(1_000_000_000).unwrap();
    assert_eq!(cost, 30_001);

    let fill = curve.apply_buy(1_000_000_000).unwrap();
    assert_eq!(fill.sol_amount, cost);
    assert_eq!(curve.real_token_reserves, 800_000_000_000_000 - 1_000_000_000);
    assert_eq!(curve.virtual_sol_reserves, 30_000_000_000 + cost);
}

#[test]
fn launch_curve_sell_past_reserve() {
    let curve = ReserveCurve::new(
        30_000_000_000,
        1_000_000_000_000_000,
        0,
        800_000_000_000_000,
        1_000_000_000_000_000,
    );
    assert_eq!(
        curve.quote_sell(1_000_000_000_000_001),
        Err(CurveError::InvalidAmount { amount: 1_000_000_000_000_001 })
    );
}
