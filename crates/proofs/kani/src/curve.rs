//! Kani proofs for reserve curve invariants
//!
//! - **C1: Buy Rounds Up** - quoted cost never undercharges the constant product
//! - **C2: Reserves Stay Representable** - apply_buy/apply_sell never underflow
//! - **C3: No Panic** - every operation returns Ok or a typed error
//! - **C4: Real Reserve Clamps** - fills and payouts never exceed real reserves
//! - **C5: Spend Floor** - a positive spend never quotes zero tokens
//! - **C6: Atomic Mutation** - a failed apply leaves the curve unchanged
//! - **C7: Spend Covers Buy** - spending a buy quote returns at least the tokens bought

use curve_model::{CurveError, ReserveCurve, LAMPORTS_PER_SOL};

/// Symbolic curve with reserves in a range Kani can solve quickly
fn any_curve(max_sol: u64, max_tok: u64) -> ReserveCurve {
    let vsol: u64 = kani::any();
    let vtok: u64 = kani::any();
    let rsol: u64 = kani::any();
    let rtok: u64 = kani::any();

    kani::assume(vsol > 0 && vsol <= max_sol);
    kani::assume(vtok > 1 && vtok <= max_tok);
    kani::assume(rsol <= vsol);
    kani::assume(rtok <= vtok);

    ReserveCurve::new(vsol, vtok, rsol, rtok, vtok)
}

/// C1: The post-buy virtual reserves never hold less than k
#[kani::proof]
#[kani::unwind(4)]
fn c1_buy_rounds_against_trader() {
    let curve = any_curve(1_000 * LAMPORTS_PER_SOL, 1 << 40);
    let dx: u64 = kani::any();
    kani::assume(dx > 0 && dx < curve.virtual_token_reserves);

    if let Ok(cost) = curve.quote_buy(dx) {
        let vsol1 = curve.virtual_sol_reserves as u128 + cost as u128;
        let vtok1 = (curve.virtual_token_reserves - dx) as u128;
        assert!(vsol1 * vtok1 >= curve.constant_product(),
            "C1: buy must not decrease k");
        assert!(cost > 0, "C1: a buy is never free");
    }
}

/// C2: After a successful buy or sell all reserves are still valid u64
#[kani::proof]
#[kani::unwind(4)]
fn c2_reserves_representable() {
    let start = any_curve(1_000 * LAMPORTS_PER_SOL, 1 << 40);
    let amount: u64 = kani::any();
    let is_buy: bool = kani::any();

    let mut curve = start;
    if is_buy {
        if let Ok(fill) = curve.apply_buy(amount) {
            assert!(fill.token_amount <= start.real_token_reserves);
            assert!(curve.virtual_token_reserves > 0,
                "C2: buy must not empty the virtual token side");
        }
    } else if let Ok(fill) = curve.apply_sell(amount) {
        assert!(fill.sol_amount <= start.real_sol_reserves);
        assert!(curve.virtual_sol_reserves <= start.virtual_sol_reserves);
    }
}

/// C3: Arbitrary u64 inputs never panic
#[kani::proof]
#[kani::unwind(4)]
fn c3_no_panic() {
    let curve = ReserveCurve::new(kani::any(), kani::any(), kani::any(), kani::any(), kani::any());
    let amount: u64 = kani::any();

    let _ = curve.quote_buy(amount);
    let _ = curve.quote_sell(amount);
    let _ = curve.tokens_for_sol(amount);
}

/// C4: Real reserves cap what leaves the pool
#[kani::proof]
#[kani::unwind(4)]
fn c4_real_reserve_clamps() {
    let curve = any_curve(1_000 * LAMPORTS_PER_SOL, 1 << 40);
    let amount: u64 = kani::any();

    if let Ok(sol) = curve.quote_sell(amount) {
        assert!(sol <= curve.real_sol_reserves, "C4: payout above real SOL");
    }

    let mut bought = curve;
    if let Ok(fill) = bought.apply_buy(amount) {
        assert!(fill.token_amount <= curve.real_token_reserves, "C4: fill above real tokens");
        assert_eq!(bought.real_token_reserves, curve.real_token_reserves - fill.token_amount);
    }
}

/// C5: Spending one or more lamports always quotes at least one token
#[kani::proof]
#[kani::unwind(4)]
fn c5_spend_floor() {
    let curve = any_curve(1_000 * LAMPORTS_PER_SOL, 1 << 40);
    let sol_in: u64 = kani::any();
    kani::assume(sol_in > 0);

    if let Ok(fill) = curve.tokens_for_sol(sol_in) {
        assert!(fill.token_amount >= 1, "C5: positive spend quoted zero tokens");
        assert_eq!(fill.sol_amount, sol_in);
    }
}

/// C6: Errors from apply_* leave every field as it was
#[kani::proof]
#[kani::unwind(4)]
fn c6_atomic_on_error() {
    let start = ReserveCurve::new(kani::any(), kani::any(), kani::any(), kani::any(), kani::any());
    let amount: u64 = kani::any();

    let mut bought = start;
    if bought.apply_buy(amount).is_err() {
        assert_eq!(bought, start, "C6: failed buy mutated state");
    }

    let mut sold = start;
    if sold.apply_sell(amount).is_err() {
        assert_eq!(sold, start, "C6: failed sell mutated state");
    }
}

/// C7: Spending exactly a buy quote returns at least the tokens that were quoted
#[kani::proof]
#[kani::unwind(4)]
fn c7_spend_covers_buy() {
    let mut curve = any_curve(1_000 * LAMPORTS_PER_SOL, 1 << 40);
    curve.real_token_reserves = curve.virtual_token_reserves;
    let dx: u64 = kani::any();
    kani::assume(dx > 0 && dx < curve.virtual_token_reserves);

    match curve.quote_buy(dx) {
        Ok(cost) => {
            let fill = curve.tokens_for_sol(cost);
            assert!(matches!(fill, Ok(f) if f.token_amount >= dx),
                "C7: spend of a buy quote returned fewer tokens");
        }
        Err(e) => assert_eq!(e, CurveError::ArithmeticOverflow),
    }
}
