//! Bonding curve account addressing

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

use crate::config::{parse_pubkey, AppConfig};

/// Seed prefix of the per-mint bonding curve PDA
pub const BONDING_CURVE_SEED: &[u8] = b"bonding-curve";

/// Bonding curve account of `mint` under `program_id`
pub fn bonding_curve_address(mint: &Pubkey, program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[BONDING_CURVE_SEED, mint.as_ref()], program_id).0
}

/// Candidate curve accounts for `mint`, one per program, in lookup order
pub fn candidate_addresses(mint: &Pubkey, program_ids: &[Pubkey]) -> Vec<(Pubkey, Pubkey)> {
    program_ids
        .iter()
        .map(|program_id| (*program_id, bonding_curve_address(mint, program_id)))
        .collect()
}

#[derive(Debug, Serialize)]
struct DerivedAddress {
    program_id: String,
    curve: String,
}

/// Print the curve account `mint` would have under each configured program
pub fn show_addresses(config: &AppConfig, mint: &str, json: bool) -> Result<()> {
    let mint = parse_pubkey(mint)?;
    let derived: Vec<DerivedAddress> = candidate_addresses(&mint, &config.program_ids)
        .into_iter()
        .map(|(program_id, curve)| DerivedAddress {
            program_id: program_id.to_string(),
            curve: curve.to_string(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&derived)?);
        return Ok(());
    }

    println!("{}", "=== Bonding Curve Addresses ===".bright_green().bold());
    println!("{} {}", "Mint:".bright_cyan(), mint);
    for entry in &derived {
        println!("{} {}", "Program:".bright_cyan(), entry.program_id);
        println!("  {} {}", "Curve:".bright_cyan(), entry.curve.bright_yellow());
    }
    Ok(())
}
