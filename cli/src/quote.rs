//! Quote, price and simulation commands

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::str::FromStr;

use curve_model::{slippage, BuyFill, ReserveCurve, LAMPORTS_PER_SOL};

use crate::config::AppConfig;
use crate::error::QuoteError;
use crate::source::{LoadedCurve, SourceArgs};
use crate::units::{format_units, lamports_to_sol, parse_units};

const SOL_DECIMALS: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReservesReport {
    pub virtual_sol_reserves: u64,
    pub virtual_token_reserves: u64,
    pub real_sol_reserves: u64,
    pub real_token_reserves: u64,
    pub initial_virtual_token_reserves: u64,
}

impl From<&ReserveCurve> for ReservesReport {
    fn from(curve: &ReserveCurve) -> Self {
        Self {
            virtual_sol_reserves: curve.virtual_sol_reserves,
            virtual_token_reserves: curve.virtual_token_reserves,
            real_sol_reserves: curve.real_sol_reserves,
            real_token_reserves: curve.real_token_reserves,
            initial_virtual_token_reserves: curve.initial_virtual_token_reserves,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuyQuote {
    pub tokens_requested: u64,
    pub tokens_filled: u64,
    pub partial_fill: bool,
    pub sol_cost: u64,
    pub max_sol_cost: u64,
    pub slippage_bps: u64,
    pub after: ReservesReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellQuote {
    pub tokens_in: u64,
    pub sol_out: u64,
    /// Payout was cut to the curve's real SOL
    pub clamped: bool,
    pub min_sol_output: u64,
    pub slippage_bps: u64,
    pub after: ReservesReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendQuote {
    pub sol_in: u64,
    pub tokens_out: u64,
    /// Lamports the buy of `tokens_out` actually costs (at most `sol_in` unless floored)
    pub sol_cost: u64,
    /// The one-token floor fired and the buy costs more than `sol_in`
    pub floored: bool,
    pub max_sol_cost: u64,
    pub slippage_bps: u64,
    pub after: ReservesReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceReport {
    pub lamports_per_token: u64,
    /// Display only
    pub sol_per_token: f64,
    pub depleted: bool,
}

pub fn buy_quote(curve: &ReserveCurve, tokens: u64, slippage_bps: u64) -> Result<BuyQuote, QuoteError> {
    let mut after = *curve;
    let fill = after.apply_buy(tokens)?;
    if fill.token_amount == 0 {
        return Err(QuoteError::InsufficientLiquidity {
            requested: tokens,
            available: curve.real_token_reserves,
        });
    }

    Ok(BuyQuote {
        tokens_requested: tokens,
        tokens_filled: fill.token_amount,
        partial_fill: fill.token_amount < tokens,
        sol_cost: fill.sol_amount,
        max_sol_cost: slippage::max_sol_cost(fill.sol_amount, slippage_bps)?,
        slippage_bps,
        after: ReservesReport::from(&after),
    })
}

pub fn sell_quote(curve: &ReserveCurve, tokens: u64, slippage_bps: u64) -> Result<SellQuote, QuoteError> {
    let unclamped = ReserveCurve { real_sol_reserves: u64::MAX, ..*curve }.quote_sell(tokens)?;
    let mut after = *curve;
    let fill = after.apply_sell(tokens)?;

    Ok(SellQuote {
        tokens_in: tokens,
        sol_out: fill.sol_amount,
        clamped: unclamped > fill.sol_amount,
        min_sol_output: slippage::min_sol_output(fill.sol_amount, slippage_bps)?,
        slippage_bps,
        after: ReservesReport::from(&after),
    })
}

pub fn spend_quote(curve: &ReserveCurve, sol_in: u64, slippage_bps: u64) -> Result<SpendQuote, QuoteError> {
    if sol_in == 0 {
        return Err(QuoteError::InvalidAmount { amount: sol_in });
    }
    let quoted = curve.tokens_for_sol(sol_in)?;

    let mut after = *curve;
    let fill = after.apply_buy(quoted.token_amount)?;
    if fill.token_amount == 0 {
        return Err(QuoteError::InsufficientLiquidity {
            requested: quoted.token_amount,
            available: curve.real_token_reserves,
        });
    }

    Ok(SpendQuote {
        sol_in,
        tokens_out: fill.token_amount,
        sol_cost: fill.sol_amount,
        floored: fill.sol_amount > sol_in,
        max_sol_cost: slippage::max_sol_cost(fill.sol_amount.max(sol_in), slippage_bps)?,
        slippage_bps,
        after: ReservesReport::from(&after),
    })
}

pub fn price_report(curve: &ReserveCurve, token_decimals: u32) -> Result<PriceReport, QuoteError> {
    let unit = 10u64
        .checked_pow(token_decimals)
        .ok_or(QuoteError::InvalidAmount { amount: token_decimals as u64 })?;
    let lamports_per_token = curve.spot_price(unit)?;

    Ok(PriceReport {
        lamports_per_token,
        sol_per_token: lamports_to_sol(lamports_per_token),
        depleted: curve.is_depleted(),
    })
}

// ============================================================================
// SIMULATION
// ============================================================================

/// One step of a simulated trade sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trade {
    /// Buy this many raw token units
    Buy(u64),
    /// Sell this many raw token units
    Sell(u64),
    /// Spend this many lamports
    Spend(u64),
}

/// Parses `buy:<tokens>`, `sell:<tokens>` and `spend:<sol>` in whole units
pub struct TradeParser {
    pub token_decimals: u32,
}

impl TradeParser {
    pub fn parse(&self, s: &str) -> Result<Trade> {
        let (kind, amount) = s
            .split_once(':')
            .with_context(|| format!("Trade {:?} must look like buy:<tokens>, sell:<tokens> or spend:<sol>", s))?;

        match kind.to_ascii_lowercase().as_str() {
            "buy" => Ok(Trade::Buy(parse_units(amount, self.token_decimals)?)),
            "sell" => Ok(Trade::Sell(parse_units(amount, self.token_decimals)?)),
            "spend" => Ok(Trade::Spend(parse_units(amount, SOL_DECIMALS)?)),
            other => anyhow::bail!("Unknown trade kind {:?} in {:?}", other, s),
        }
    }
}

impl FromStr for Trade {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        TradeParser { token_decimals: curve_model::TOKEN_DECIMALS }.parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimStep {
    pub step: usize,
    pub side: &'static str,
    pub token_amount: u64,
    pub sol_amount: u64,
    pub after: ReservesReport,
}

/// Quote a spend and execute the resulting buy
fn spend(state: &mut ReserveCurve, sol_in: u64) -> Result<BuyFill, QuoteError> {
    if sol_in == 0 {
        return Err(QuoteError::InvalidAmount { amount: sol_in });
    }
    let quoted = state.tokens_for_sol(sol_in)?;
    Ok(state.apply_buy(quoted.token_amount)?)
}

/// Apply `trades` in order to a copy of `curve`
pub fn simulate(curve: &ReserveCurve, trades: &[Trade]) -> Result<(ReserveCurve, Vec<SimStep>)> {
    let mut state = *curve;
    let mut steps = Vec::with_capacity(trades.len());

    for (i, trade) in trades.iter().enumerate() {
        let step = i + 1;
        let (side, token_amount, sol_amount) = match *trade {
            Trade::Buy(tokens) => {
                let fill = state.apply_buy(tokens).map_err(QuoteError::from)
                    .with_context(|| format!("Step {} (buy) failed", step))?;
                ("buy", fill.token_amount, fill.sol_amount)
            }
            Trade::Sell(tokens) => {
                let fill = state.apply_sell(tokens).map_err(QuoteError::from)
                    .with_context(|| format!("Step {} (sell) failed", step))?;
                ("sell", fill.token_amount, fill.sol_amount)
            }
            Trade::Spend(sol) => {
                let fill = spend(&mut state, sol)
                    .with_context(|| format!("Step {} (spend) failed", step))?;
                ("spend", fill.token_amount, fill.sol_amount)
            }
        };
        log::debug!("step {}: {} {} tokens for {} lamports", step, side, token_amount, sol_amount);

        steps.push(SimStep { step, side, token_amount, sol_amount, after: ReservesReport::from(&state) });
    }

    Ok((state, steps))
}

// ============================================================================
// COMMANDS
// ============================================================================

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_source(loaded: &LoadedCurve) {
    println!("{} {}", "Source:".bright_cyan(), loaded.origin);
    if let Some(address) = &loaded.address {
        println!("{} {}", "Account:".bright_cyan(), address);
    }
}

fn print_reserves(curve: &ReservesReport, token_decimals: u32) {
    println!("{} {} SOL", "Virtual SOL:".bright_cyan(), format_units(curve.virtual_sol_reserves, SOL_DECIMALS));
    println!("{} {}", "Virtual tokens:".bright_cyan(), format_units(curve.virtual_token_reserves, token_decimals));
    println!("{} {} SOL", "Real SOL:".bright_cyan(), format_units(curve.real_sol_reserves, SOL_DECIMALS));
    println!("{} {}", "Real tokens:".bright_cyan(), format_units(curve.real_token_reserves, token_decimals));
    println!("{} {}", "Initial virtual tokens:".bright_cyan(), format_units(curve.initial_virtual_token_reserves, token_decimals));
}

pub async fn show_curve(config: &AppConfig, source: &SourceArgs, json: bool) -> Result<()> {
    let loaded = source.load(config).await?;
    let report = ReservesReport::from(&loaded.curve);
    if json {
        return print_json(&report);
    }

    println!("{}", "=== Bonding Curve ===".bright_green().bold());
    print_source(&loaded);
    print_reserves(&report, config.token_decimals);
    println!("{} {}", "k (x*y):".bright_cyan(), loaded.curve.constant_product());
    if loaded.curve.is_depleted() {
        println!("{}", "Curve has no real tokens left".yellow());
    }
    Ok(())
}

pub async fn quote_buy(config: &AppConfig, source: &SourceArgs, amount: &str, raw: bool, slippage_bps: Option<u64>, json: bool) -> Result<()> {
    let tokens = if raw { amount.parse()? } else { parse_units(amount, config.token_decimals)? };
    let loaded = source.load(config).await?;
    let quote = buy_quote(&loaded.curve, tokens, slippage_bps.unwrap_or(config.slippage_bps))?;
    if json {
        return print_json(&quote);
    }

    let d = config.token_decimals;
    println!("{}", "=== Quote Buy ===".bright_green().bold());
    print_source(&loaded);
    println!("{} {}", "Tokens:".bright_cyan(), format_units(quote.tokens_filled, d));
    if quote.partial_fill {
        println!("{} only {} of {} available", "Partial fill:".yellow(),
            format_units(quote.tokens_filled, d), format_units(quote.tokens_requested, d));
    }
    println!("{} {} SOL", "Cost:".bright_cyan(), format_units(quote.sol_cost, SOL_DECIMALS));
    println!("{} {} SOL ({} bps)", "Max cost:".bright_cyan(), format_units(quote.max_sol_cost, SOL_DECIMALS), quote.slippage_bps);
    Ok(())
}

pub async fn quote_sell(config: &AppConfig, source: &SourceArgs, amount: &str, raw: bool, slippage_bps: Option<u64>, json: bool) -> Result<()> {
    let tokens = if raw { amount.parse()? } else { parse_units(amount, config.token_decimals)? };
    let loaded = source.load(config).await?;
    let quote = sell_quote(&loaded.curve, tokens, slippage_bps.unwrap_or(config.slippage_bps))?;
    if json {
        return print_json(&quote);
    }

    println!("{}", "=== Quote Sell ===".bright_green().bold());
    print_source(&loaded);
    println!("{} {}", "Tokens:".bright_cyan(), format_units(quote.tokens_in, config.token_decimals));
    println!("{} {} SOL", "Payout:".bright_cyan(), format_units(quote.sol_out, SOL_DECIMALS));
    if quote.clamped {
        println!("{}", "Payout limited by the curve's real SOL".yellow());
    }
    println!("{} {} SOL ({} bps)", "Min payout:".bright_cyan(), format_units(quote.min_sol_output, SOL_DECIMALS), quote.slippage_bps);
    Ok(())
}

pub async fn quote_spend(config: &AppConfig, source: &SourceArgs, amount: &str, slippage_bps: Option<u64>, json: bool) -> Result<()> {
    let sol_in = parse_units(amount, SOL_DECIMALS)?;
    let loaded = source.load(config).await?;
    let quote = spend_quote(&loaded.curve, sol_in, slippage_bps.unwrap_or(config.slippage_bps))?;
    if json {
        return print_json(&quote);
    }

    println!("{}", "=== Quote Spend ===".bright_green().bold());
    print_source(&loaded);
    println!("{} {} SOL", "Spend:".bright_cyan(), format_units(quote.sol_in, SOL_DECIMALS));
    println!("{} {}", "Tokens:".bright_cyan(), format_units(quote.tokens_out, config.token_decimals));
    println!("{} {} SOL", "Exact cost:".bright_cyan(), format_units(quote.sol_cost, SOL_DECIMALS));
    if quote.floored {
        println!("{}", "One token costs more than the amount spent".yellow());
    }
    println!("{} {} SOL ({} bps)", "Max cost:".bright_cyan(), format_units(quote.max_sol_cost, SOL_DECIMALS), quote.slippage_bps);
    Ok(())
}

pub async fn show_price(config: &AppConfig, source: &SourceArgs, json: bool) -> Result<()> {
    let loaded = source.load(config).await?;
    let report = price_report(&loaded.curve, config.token_decimals)?;
    if json {
        return print_json(&report);
    }

    println!("{}", "=== Spot Price ===".bright_green().bold());
    print_source(&loaded);
    println!("{} {} lamports ({:.9} SOL)", "Price per token:".bright_cyan(), report.lamports_per_token, report.sol_per_token);
    let tokens_per_sol = loaded.curve.tokens_for_sol(LAMPORTS_PER_SOL).map_err(QuoteError::from)?;
    println!("{} {}", "Tokens per SOL:".bright_cyan(), format_units(tokens_per_sol.token_amount, config.token_decimals));
    Ok(())
}

pub async fn run_simulation(config: &AppConfig, source: &SourceArgs, trades: &[String], json: bool) -> Result<()> {
    let parser = TradeParser { token_decimals: config.token_decimals };
    let trades = trades.iter().map(|t| parser.parse(t)).collect::<Result<Vec<_>>>()?;
    let loaded = source.load(config).await?;
    let (end, steps) = simulate(&loaded.curve, &trades)?;
    if json {
        return print_json(&steps);
    }

    let d = config.token_decimals;
    println!("{}", "=== Simulation ===".bright_green().bold());
    print_source(&loaded);
    for step in &steps {
        println!(
            "{} {:<5} {} tokens  {} SOL",
            format!("#{}", step.step).dimmed(),
            step.side.to_uppercase(),
            format_units(step.token_amount, d),
            format_units(step.sol_amount, SOL_DECIMALS),
        );
    }
    println!("\n{}", "Final reserves".bright_green());
    print_reserves(&ReservesReport::from(&end), d);
    Ok(())
}
