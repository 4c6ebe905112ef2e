//! Tokencurve CLI - Read-only pricing for bonding curve tokens
//!
//! Decodes bonding curve accounts (from a file, inline data, or a Solana
//! RPC node) and quotes buys, sells and SOL spends against their reserves.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod cache;
mod client;
mod config;
mod error;
mod pda;
mod quote;
mod source;
mod units;
mod watch;

use config::AppConfig;
use source::SourceArgs;

#[derive(Parser)]
#[command(name = "tokencurve")]
#[command(about = "Bonding curve pricing - decode reserves and quote trades", long_about = None)]
#[command(version)]
struct Cli {
    /// Network to connect to (localnet, devnet, mainnet-beta)
    #[arg(short, long, global = true)]
    network: Option<String>,

    /// RPC URL (overrides network default)
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Path to config file (default: ~/.config/tokencurve/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a curve account and show its reserves
    Decode {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Quote a trade against a curve
    Quote {
        #[command(subcommand)]
        command: QuoteCommands,
    },

    /// Apply a sequence of trades to a curve without sending anything
    Simulate {
        #[command(flatten)]
        source: SourceArgs,

        /// Trades in order: buy:<tokens>, sell:<tokens>, spend:<sol>
        #[arg(required = true, num_args = 1..)]
        trades: Vec<String>,
    },

    /// Show the spot price of one whole token
    Price {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Derive the bonding curve account address of a mint
    Address {
        /// Token mint
        mint: String,
    },

    /// Poll a curve and print its price
    Watch {
        /// Token mint
        mint: String,

        /// Seconds between polls
        #[arg(short, long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
        interval: u64,

        /// Stop after this many polls (default: run until interrupted)
        #[arg(long)]
        ticks: Option<u64>,

        /// Byte offset of the reserve record
        #[arg(long)]
        offset: Option<usize>,
    },
}

#[derive(Subcommand)]
enum QuoteCommands {
    /// SOL needed to buy an amount of tokens
    Buy {
        #[command(flatten)]
        source: SourceArgs,

        /// Token amount (whole tokens, decimals allowed)
        amount: String,

        /// Amount is in raw token units
        #[arg(long)]
        raw: bool,

        /// Slippage tolerance in basis points
        #[arg(long)]
        slippage_bps: Option<u64>,
    },

    /// SOL received for selling an amount of tokens
    Sell {
        #[command(flatten)]
        source: SourceArgs,

        /// Token amount (whole tokens, decimals allowed)
        amount: String,

        /// Amount is in raw token units
        #[arg(long)]
        raw: bool,

        /// Slippage tolerance in basis points
        #[arg(long)]
        slippage_bps: Option<u64>,
    },

    /// Tokens received for spending an amount of SOL
    Spend {
        #[command(flatten)]
        source: SourceArgs,

        /// SOL amount (decimals allowed)
        amount: String,

        /// Slippage tolerance in basis points
        #[arg(long)]
        slippage_bps: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.network.as_deref(), cli.url.clone(), cli.config.as_deref())?;

    if cli.verbose {
        println!("{} {}", "Network:".bright_cyan(), config.network);
        println!("{} {}", "RPC URL:".bright_cyan(), config.rpc_url);
        if let Some(path) = &config.config_path {
            println!("{} {}", "Config:".bright_cyan(), path.display());
        }
        println!("{} {}", "Programs:".bright_cyan(), config.program_ids.len());
    }

    let json = cli.json;
    match cli.command {
        Commands::Decode { source } => {
            quote::show_curve(&config, &source, json).await?;
        }
        Commands::Quote { command } => {
            match command {
                QuoteCommands::Buy { source, amount, raw, slippage_bps } => {
                    quote::quote_buy(&config, &source, &amount, raw, slippage_bps, json).await?;
                }
                QuoteCommands::Sell { source, amount, raw, slippage_bps } => {
                    quote::quote_sell(&config, &source, &amount, raw, slippage_bps, json).await?;
                }
                QuoteCommands::Spend { source, amount, slippage_bps } => {
                    quote::quote_spend(&config, &source, &amount, slippage_bps, json).await?;
                }
            }
        }
        Commands::Simulate { source, trades } => {
            quote::run_simulation(&config, &source, &trades, json).await?;
        }
        Commands::Price { source } => {
            quote::show_price(&config, &source, json).await?;
        }
        Commands::Address { mint } => {
            pda::show_addresses(&config, &mint, json)?;
        }
        Commands::Watch { mint, interval, ticks, offset } => {
            watch::watch_price(&config, &mint, interval, ticks, offset).await?;
        }
    }

    Ok(())
}
