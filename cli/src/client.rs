//! Read-only Solana RPC helpers

use anyhow::{Context, Result};
use colored::Colorize;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

use crate::config::AppConfig;
use crate::pda;

/// Create an RPC client from the network configuration
pub fn create_rpc_client(config: &AppConfig) -> RpcClient {
    RpcClient::new_with_commitment(config.rpc_url.clone(), CommitmentConfig::confirmed())
}

/// Get account data, `None` if the account does not exist
pub async fn get_account_data(client: &RpcClient, address: &Pubkey) -> Result<Option<Vec<u8>>> {
    let response = client
        .get_account_with_commitment(address, CommitmentConfig::confirmed())
        .await
        .with_context(|| format!("Failed to get account: {}", address))?;

    Ok(response.value.map(|account| account.data))
}

/// Locate the bonding curve account of `mint`, trying each configured program in order
pub async fn find_curve_account(
    config: &AppConfig,
    client: &RpcClient,
    mint: &Pubkey,
) -> Result<(Pubkey, Vec<u8>)> {
    for (program_id, address) in pda::candidate_addresses(mint, &config.program_ids) {
        log::debug!("trying curve account {} under program {}", address, program_id);
        if let Some(data) = get_account_data(client, &address).await? {
            return Ok((address, data));
        }
    }

    anyhow::bail!(
        "No bonding curve account found for mint {} under {} program(s)",
        mint,
        config.program_ids.len()
    )
}

/// Pretty print a pubkey as shortened address
pub fn format_pubkey(pubkey: &Pubkey) -> String {
    let addr = pubkey.to_string();
    format!("{}...{}", &addr[0..8], &addr[addr.len() - 8..]).bright_yellow().to_string()
}
