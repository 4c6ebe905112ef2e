//! Network configuration and config file loading

use anyhow::{Context, Result};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use curve_model::slippage::DEFAULT_SLIPPAGE_BPS;
use curve_model::TOKEN_DECIMALS;

/// Bonding curve programs whose accounts use the five-u64 reserve layout
pub const DEFAULT_CURVE_PROGRAM_IDS: [&str; 2] = [
    "65YAWs68bmR2RpQrs2zyRNTum2NRrdWzUfUTew9kydN9",
    "Ei1CgRq6SMB8wQScEKeRMGYkyb3YmRTaej1hpHcqAV9r",
];

/// How long a fetched curve stays fresh (seconds)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Largest decimals whose whole-token unit still fits in a u64
pub const MAX_TOKEN_DECIMALS: u32 = 19;

const DEFAULT_CONFIG_PATH: &str = "~/.config/tokencurve/config.toml";

/// Optional TOML file; every key overrides a built-in default
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub network: Option<String>,
    pub rpc_url: Option<String>,
    pub program_ids: Option<Vec<String>>,
    pub cache_ttl_secs: Option<u64>,
    pub slippage_bps: Option<u64>,
    pub token_decimals: Option<u32>,
}

impl FileConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid config file")
    }
}

pub struct AppConfig {
    pub network: String,
    pub rpc_url: String,
    pub program_ids: Vec<Pubkey>,
    pub cache_ttl: Duration,
    pub slippage_bps: u64,
    pub token_decimals: u32,
    pub config_path: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve configuration: flags, then config file, then Solana CLI config, then defaults
    pub fn load(network: Option<&str>, rpc_url: Option<String>, config_path: Option<&Path>) -> Result<Self> {
        let (file, config_path) = match config_path {
            Some(path) => (read_config_file(path)?, Some(path.to_path_buf())),
            None => {
                let default_path = PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).into_owned());
                if default_path.exists() {
                    (read_config_file(&default_path)?, Some(default_path))
                } else {
                    (FileConfig::default(), None)
                }
            }
        };

        Self::from_parts(network, rpc_url, file, solana_cli_rpc_url(), config_path)
    }

    fn from_parts(
        network: Option<&str>,
        rpc_url: Option<String>,
        file: FileConfig,
        solana_cli_url: Option<String>,
        config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let chosen_network = network.map(str::to_string).or(file.network);
        let network = chosen_network.clone().unwrap_or_else(|| "mainnet-beta".to_string());
        let network_rpc = network_rpc_url(&network)?;

        // An explicit network wins over whatever the Solana CLI points at
        let rpc_url = match (rpc_url.or(file.rpc_url), chosen_network) {
            (Some(url), _) => url,
            (None, Some(_)) => network_rpc,
            (None, None) => solana_cli_url.unwrap_or(network_rpc),
        };

        let program_ids = match file.program_ids {
            Some(ids) => ids.iter().map(|s| parse_pubkey(s)).collect::<Result<Vec<_>>>()?,
            None => DEFAULT_CURVE_PROGRAM_IDS
                .iter()
                .map(|s| parse_pubkey(s))
                .collect::<Result<Vec<_>>>()?,
        };
        if program_ids.is_empty() {
            anyhow::bail!("program_ids must list at least one curve program");
        }

        let slippage_bps = file.slippage_bps.unwrap_or(DEFAULT_SLIPPAGE_BPS);
        if slippage_bps > curve_model::BPS_SCALE {
            anyhow::bail!("slippage_bps must be at most 10000, got {}", slippage_bps);
        }

        let token_decimals = file.token_decimals.unwrap_or(TOKEN_DECIMALS);
        if token_decimals > MAX_TOKEN_DECIMALS {
            anyhow::bail!("token_decimals must be at most {}, got {}", MAX_TOKEN_DECIMALS, token_decimals);
        }

        Ok(Self {
            network,
            rpc_url,
            program_ids,
            cache_ttl: Duration::from_secs(file.cache_ttl_secs.unwrap_or(DEFAULT_CACHE_TTL_SECS)),
            slippage_bps,
            token_decimals,
            config_path,
        })
    }
}

fn network_rpc_url(network: &str) -> Result<String> {
    let url = match network {
        "localnet" | "local" => "http://127.0.0.1:8899",
        "devnet" => "https://api.devnet.solana.com",
        "mainnet-beta" | "mainnet" => "https://api.mainnet-beta.solana.com",
        _ => anyhow::bail!("Unknown network: {}. Use localnet, devnet, or mainnet-beta", network),
    };
    Ok(url.to_string())
}

/// RPC URL from the Solana CLI config, if one is installed
fn solana_cli_rpc_url() -> Option<String> {
    let path = (*solana_cli_config::CONFIG_FILE).as_ref()?;
    let config = solana_cli_config::Config::load(path).ok()?;
    log::debug!("using Solana CLI config at {}", path);
    Some(config.json_rpc_url)
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    FileConfig::from_toml(&text).with_context(|| format!("In config file: {}", path.display()))
}

pub fn parse_pubkey(s: &str) -> Result<Pubkey> {
    Pubkey::from_str(s).with_context(|| format!("Invalid public key: {}", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_parts(None, None, FileConfig::default(), None, None).unwrap();
        assert_eq!(config.network, "mainnet-beta");
        assert_eq!(config.rpc_url, "https://api.mainnet-beta.solana.com");
        assert_eq!(config.program_ids.len(), 2);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.slippage_bps, 50);
        assert_eq!(config.token_decimals, 6);
    }

    #[test]
    fn test_network_urls() {
        let config = AppConfig::from_parts(Some("devnet"), None, FileConfig::default(), None, None).unwrap();
        assert_eq!(config.rpc_url, "https://api.devnet.solana.com");

        let err = AppConfig::from_parts(Some("moonnet"), None, FileConfig::default(), None, None);
        assert!(err.is_err());
    }

    #[test]
    fn test_rpc_precedence() {
        let cli_url = Some("http://solana-cli:8899".to_string());

        // Nothing chosen: Solana CLI config applies
        let config = AppConfig::from_parts(None, None, FileConfig::default(), cli_url.clone(), None).unwrap();
        assert_eq!(config.rpc_url, "http://solana-cli:8899");

        // Explicit network beats Solana CLI config
        let config = AppConfig::from_parts(Some("localnet"), None, FileConfig::default(), cli_url.clone(), None).unwrap();
        assert_eq!(config.rpc_url, "http://127.0.0.1:8899");

        // Explicit URL beats everything
        let config = AppConfig::from_parts(
            Some("localnet"),
            Some("http://flag:1".to_string()),
            FileConfig::default(),
            cli_url,
            None,
        )
        .unwrap();
        assert_eq!(config.rpc_url, "http://flag:1");
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
network = "devnet"
program_ids = ["Ei1CgRq6SMB8wQScEKeRMGYkyb3YmRTaej1hpHcqAV9r"]
cache_ttl_secs = 5
slippage_bps = 125
"#
        )
        .unwrap();

        let config = AppConfig::load(None, None, Some(file.path())).unwrap();
        assert_eq!(config.network, "devnet");
        assert_eq!(config.rpc_url, "https://api.devnet.solana.com");
        assert_eq!(config.program_ids, vec![parse_pubkey(DEFAULT_CURVE_PROGRAM_IDS[1]).unwrap()]);
        assert_eq!(config.cache_ttl, Duration::from_secs(5));
        assert_eq!(config.slippage_bps, 125);
        assert_eq!(config.config_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(FileConfig::from_toml("unknown_key = 1").is_err());

        let file = FileConfig { slippage_bps: Some(10_001), ..FileConfig::default() };
        assert!(AppConfig::from_parts(None, None, file, None, None).is_err());

        let file = FileConfig { token_decimals: Some(40), ..FileConfig::default() };
        assert!(AppConfig::from_parts(None, None, file, None, None).is_err());

        let file = FileConfig { token_decimals: Some(MAX_TOKEN_DECIMALS + 1), ..FileConfig::default() };
        assert!(AppConfig::from_parts(None, None, file, None, None).is_err());

        let file = FileConfig { token_decimals: Some(MAX_TOKEN_DECIMALS), ..FileConfig::default() };
        assert_eq!(AppConfig::from_parts(None, None, file, None, None).unwrap().token_decimals, 19);

        let file = FileConfig { program_ids: Some(vec![]), ..FileConfig::default() };
        assert!(AppConfig::from_parts(None, None, file, None, None).is_err());

        let file = FileConfig { program_ids: Some(vec!["not-a-key".into()]), ..FileConfig::default() };
        assert!(AppConfig::from_parts(None, None, file, None, None).is_err());
    }
}
