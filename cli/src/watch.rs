//! Poll a curve account and print its spot price

use anyhow::Result;
use colored::Colorize;
use solana_sdk::pubkey::Pubkey;
use std::time::{Duration, Instant};
use tokio::time::sleep;

use curve_model::{ReserveCurve, ReserveLayout};

use crate::cache::CurveCache;
use crate::client;
use crate::config::{parse_pubkey, AppConfig};
use crate::error::QuoteError;
use crate::quote::price_report;
use crate::source;
use crate::units::lamports_to_sol;

/// Curve for `address`: from the cache while fresh, otherwise re-read over RPC
async fn current_curve(
    cache: &mut CurveCache,
    rpc: &solana_client::nonblocking::rpc_client::RpcClient,
    address: &Pubkey,
    layout: &ReserveLayout,
) -> Result<ReserveCurve> {
    let now = Instant::now();
    if let Some(curve) = cache.get(address, now) {
        log::debug!("cache hit for {}", address);
        return Ok(curve);
    }

    log::debug!("cache miss for {}, fetching", address);
    let data = client::get_account_data(rpc, address)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Curve account {} no longer exists", address))?;
    let curve = source::decode(layout, &data)?;
    cache.insert(*address, curve, now);
    Ok(curve)
}

pub async fn watch_price(
    config: &AppConfig,
    mint: &str,
    interval_secs: u64,
    ticks: Option<u64>,
    offset: Option<usize>,
) -> Result<()> {
    let mint = parse_pubkey(mint)?;
    let layout = offset.map(ReserveLayout::at).unwrap_or_default();
    let rpc = client::create_rpc_client(config);
    let (address, _) = client::find_curve_account(config, &rpc, &mint).await?;
    let mut cache = CurveCache::new(config.cache_ttl);

    println!("{}", "=== Watching Curve ===".bright_green().bold());
    println!("{} {}", "Mint:".bright_cyan(), client::format_pubkey(&mint));
    println!("{} {}", "Curve:".bright_cyan(), client::format_pubkey(&address));
    println!("{} {}s (cache ttl {}s)", "Interval:".bright_cyan(), interval_secs, config.cache_ttl.as_secs());
    if ticks.is_none() {
        println!("{}", "(Press Ctrl+C to stop)".dimmed());
    }

    let interval_duration = Duration::from_secs(interval_secs);
    let mut tick = 0u64;
    loop {
        if ticks.is_some_and(|n| tick >= n) {
            return Ok(());
        }
        if tick > 0 {
            sleep(interval_duration).await;
        }
        tick += 1;
        if !cache.is_empty() {
            let purged = cache.purge_expired(Instant::now());
            log::debug!("purged {} expired curve(s), {} cached", purged, cache.len());
        }
        let stamp = format!("[{}]", chrono::Local::now().format("%H:%M:%S")).dimmed();
        let curve = match current_curve(&mut cache, &rpc, &address, &layout).await {
            Ok(curve) => curve,
            Err(err) => match err.downcast_ref::<QuoteError>() {
                Some(quote_err) if quote_err.requires_refetch() => {
                    log::warn!("unreadable curve account {}: {}", address, quote_err);
                    cache.evict(&address);
                    println!("{} {}", stamp, quote_err.to_string().red());
                    continue;
                }
                _ => return Err(err),
            },
        };

        match price_report(&curve, config.token_decimals) {
            Ok(report) => {
                log::info!("tick {}: {} lamports/token", tick, report.lamports_per_token);
                println!(
                    "{} {:.9} SOL  real SOL {:.4}{}",
                    stamp,
                    report.sol_per_token,
                    lamports_to_sol(curve.real_sol_reserves),
                    if report.depleted { "  (depleted)".yellow().to_string() } else { String::new() },
                );
            }
            Err(err) if err.requires_refetch() => {
                log::warn!("dropping cached curve {}: {}", address, err);
                cache.evict(&address);
                println!("{} {}", stamp, err.to_string().red());
            }
            Err(err) => {
                println!("{} {}", stamp, err.to_string().yellow());
            }
        }
    }
}
