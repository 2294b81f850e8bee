//! qikchain CLI - genesis synthesis, validation and allocation tooling.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use qikchain_genesis::{Consensus, Environment, GenesisError};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod commands;
mod errors;
mod output;

use commands::{allocations_report, allocations_verify, canonicalize, genesis_build, genesis_validate};

#[derive(Parser)]
#[command(name = "qikchain")]
#[command(about = "qikchain genesis synthesis and validation CLI")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Genesis and chain-config artifacts
    Genesis {
        #[command(subcommand)]
        command: GenesisCommands,
    },
    /// Token allocation ledger
    Allocations {
        #[command(subcommand)]
        command: AllocationCommands,
    },
    /// Show canonical bytes for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<PathBuf>,
        /// Indent with two spaces
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Subcommand)]
enum GenesisCommands {
    /// Build chain config, raw genesis and metadata
    Build(BuildArgs),
    /// Validate a chain config or raw genesis document
    Validate {
        /// Document to validate
        file: PathBuf,
        /// Fail on legacy top-level consensus keys
        #[arg(long)]
        strict: bool,
        /// Accept the legacy top-level consensus schema with a warning
        #[arg(long)]
        accept_legacy_consensus: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum AllocationCommands {
    /// Check an allocation ledger
    Verify {
        /// Allocation file
        #[arg(long, env = "QIKCHAIN_ALLOCATIONS", default_value = "config/allocations/devnet.json")]
        file: PathBuf,
        /// Accept the zero address
        #[arg(long)]
        allow_zero_address: bool,
    },
    /// Print the premine breakdown
    Report {
        /// Allocation file
        #[arg(long, env = "QIKCHAIN_ALLOCATIONS", default_value = "config/allocations/devnet.json")]
        file: PathBuf,
        /// Token metadata file
        #[arg(long, env = "QIKCHAIN_TOKEN", default_value = "config/token.json")]
        token: PathBuf,
        /// Maximum fractional digits in QIK amounts
        #[arg(long, default_value_t = 6)]
        max_decimals: i32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Flags for `genesis build`.
#[derive(clap::Args)]
pub struct BuildArgs {
    /// Consensus mode (poa|pos)
    #[arg(long, env = "QIKCHAIN_CONSENSUS", default_value = "poa")]
    pub consensus: Consensus,
    /// Environment (devnet|staging|mainnet)
    #[arg(long, env = "QIKCHAIN_ENV", default_value = "devnet")]
    pub env: Environment,
    /// Genesis template
    #[arg(long, env = "QIKCHAIN_TEMPLATE", default_value = "config/genesis.template.json")]
    pub template: PathBuf,
    /// Directory holding <consensus>.json overlays
    #[arg(long, env = "QIKCHAIN_OVERLAY_DIR", default_value = "config/consensus")]
    pub overlay_dir: PathBuf,
    /// Token metadata file
    #[arg(long, env = "QIKCHAIN_TOKEN", default_value = "config/token.json")]
    pub token: PathBuf,
    /// Allocation file (default: config/allocations/<env>.json)
    #[arg(long, env = "QIKCHAIN_ALLOCATIONS")]
    pub allocations: Option<PathBuf>,
    /// PoS deployments file
    #[arg(long, env = "QIKCHAIN_POS_DEPLOYMENTS", default_value = "build/pos-deployments.json")]
    pub pos_deployments: PathBuf,
    /// Chain id (required, non-zero)
    #[arg(long, env = "QIKCHAIN_CHAIN_ID", default_value_t = 0)]
    pub chain_id: u64,
    /// Block gas limit (decimal or 0x-hex)
    #[arg(long, alias = "block-gas-limit", default_value = "0x1c9c380")]
    pub gas_limit: String,
    /// Genesis difficulty (decimal or 0x-hex)
    #[arg(long, default_value = "0x1")]
    pub difficulty: String,
    /// Genesis extraData
    #[arg(long, default_value = "0x")]
    pub extra_data: String,
    /// Minimum gas price in wei
    #[arg(long, default_value = "0")]
    pub min_gas_price: String,
    /// Enable the EIP-1559 base fee
    #[arg(long)]
    pub base_fee_enabled: bool,
    /// Fail on unresolved placeholders and legacy consensus keys
    #[arg(long)]
    pub strict: bool,
    /// Accept the legacy top-level consensus schema with a warning
    #[arg(long)]
    pub accept_legacy_consensus: bool,
    /// Use placeholder PoS addresses when deployments are missing
    #[arg(long)]
    pub allow_missing_pos_addresses: bool,
    /// Indent output with two spaces
    #[arg(long)]
    pub pretty: bool,
    /// Forks the node supports, comma separated (default: all)
    #[arg(long, value_delimiter = ',')]
    pub supported_forks: Option<Vec<String>>,
    /// Combined chain document (default: build/genesis.json)
    #[arg(long)]
    pub out_combined: Option<PathBuf>,
    /// Deprecated alias of --out-combined
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Split chain config (default: chain.json next to the combined output)
    #[arg(long)]
    pub out_chain: Option<PathBuf>,
    /// Raw genesis (default: genesis-eth.json next to the chain config)
    #[arg(long)]
    pub out_genesis: Option<PathBuf>,
    /// Chain metadata (default: chain-metadata.json next to the chain config)
    #[arg(long)]
    pub metadata_out: Option<PathBuf>,
    /// Print the build summary as JSON
    #[arg(long)]
    pub json: bool,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Genesis { command } => match command {
            GenesisCommands::Build(args) => genesis_build::run(args),
            GenesisCommands::Validate {
                file,
                strict,
                accept_legacy_consensus,
                json,
            } => genesis_validate::run(file, strict, accept_legacy_consensus, json),
        },
        Commands::Allocations { command } => match command {
            AllocationCommands::Verify {
                file,
                allow_zero_address,
            } => allocations_verify::run(file, allow_zero_address),
            AllocationCommands::Report {
                file,
                token,
                max_decimals,
                json,
            } => allocations_report::run(file, token, max_decimals, json),
        },
        Commands::Canonicalize { input, pretty } => canonicalize::run(input, pretty),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match e.downcast_ref::<GenesisError>() {
            Some(GenesisError::InvalidOptions(_)) => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}
