//! Where curve account bytes come from

use anyhow::{Context, Result};
use clap::Args;
use solana_sdk::pubkey::Pubkey;
use std::fs;
use std::path::PathBuf;

use curve_model::{ReserveCurve, ReserveLayout};

use crate::client;
use crate::config::{parse_pubkey, AppConfig};
use crate::error::QuoteError;

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourcePick {
    /// File holding raw account data
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Base58-encoded account data
    #[arg(long)]
    pub data: Option<String>,

    /// Curve account address (read over RPC)
    #[arg(long)]
    pub account: Option<String>,

    /// Token mint; the curve account is derived and read over RPC
    #[arg(long)]
    pub mint: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    #[command(flatten)]
    pub pick: SourcePick,

    /// Byte offset of the reserve record (default: after the 8-byte discriminator)
    #[arg(long)]
    pub offset: Option<usize>,
}

/// A decoded curve and where it came from
#[derive(Debug, Clone)]
pub struct LoadedCurve {
    pub curve: ReserveCurve,
    pub address: Option<Pubkey>,
    pub origin: String,
}

impl SourceArgs {
    pub fn layout(&self) -> ReserveLayout {
        self.offset.map(ReserveLayout::at).unwrap_or_default()
    }

    /// Read the account bytes and decode the reserve record
    pub async fn load(&self, config: &AppConfig) -> Result<LoadedCurve> {
        let (data, address, origin) = self.read_bytes(config).await?;
        let curve = decode(&self.layout(), &data)?;
        log::debug!("decoded {} ({} bytes): {:?}", origin, data.len(), curve);

        Ok(LoadedCurve { curve, address, origin })
    }

    async fn read_bytes(&self, config: &AppConfig) -> Result<(Vec<u8>, Option<Pubkey>, String)> {
        let pick = &self.pick;
        if let Some(path) = &pick.file {
            let data = fs::read(path)
                .with_context(|| format!("Failed to read account file: {}", path.display()))?;
            return Ok((data, None, path.display().to_string()));
        }
        if let Some(encoded) = &pick.data {
            let data = bs58::decode(encoded.trim())
                .into_vec()
                .context("Account data is not valid base58")?;
            return Ok((data, None, "inline data".to_string()));
        }

        let client = client::create_rpc_client(config);
        if let Some(account) = &pick.account {
            let address = parse_pubkey(account)?;
            let data = client::get_account_data(&client, &address)
                .await?
                .with_context(|| format!("Account not found: {}", address))?;
            return Ok((data, Some(address), "RPC account".to_string()));
        }
        if let Some(mint) = &pick.mint {
            let mint = parse_pubkey(mint)?;
            let (address, data) = client::find_curve_account(config, &client, &mint).await?;
            return Ok((data, Some(address), format!("RPC, derived from mint {}", mint)));
        }

        anyhow::bail!("No account source given: use --file, --data, --account or --mint")
    }
}

pub fn decode(layout: &ReserveLayout, data: &[u8]) -> Result<ReserveCurve, QuoteError> {
    Ok(layout.decode(data)?)
}
