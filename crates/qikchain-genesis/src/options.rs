//! Build configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::warn;

use crate::errors::GenesisError;

/// Consensus engine the chain runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Consensus {
    /// Proof of authority.
    #[default]
    Poa,
    /// Proof of stake.
    Pos,
}

impl Consensus {
    /// Lowercase identifier, also the overlay file stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            Consensus::Poa => "poa",
            Consensus::Pos => "pos",
        }
    }

    /// Value of `params.engine.ibft.type`.
    pub fn ibft_type(&self) -> &'static str {
        match self {
            Consensus::Poa => "PoA",
            Consensus::Pos => "PoS",
        }
    }
}

impl fmt::Display for Consensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Consensus {
    type Err = GenesisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "poa" => Ok(Consensus::Poa),
            "pos" => Ok(Consensus::Pos),
            other => Err(GenesisError::InvalidOptions(format!(
                "consensus must be poa or pos, got {:?}",
                other
            ))),
        }
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    /// Local development network; all supported forks active at block 0.
    #[default]
    Devnet,
    /// Pre-production network.
    Staging,
    /// Production network.
    Mainnet,
}

impl Environment {
    /// Lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Devnet => "devnet",
            Environment::Staging => "staging",
            Environment::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = GenesisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "devnet" => Ok(Environment::Devnet),
            "staging" => Ok(Environment::Staging),
            "mainnet" => Ok(Environment::Mainnet),
            other => Err(GenesisError::InvalidOptions(format!(
                "env must be devnet, staging or mainnet, got {:?}",
                other
            ))),
        }
    }
}

/// Where build artifacts go. Unset paths are derived from the others.
#[derive(Debug, Clone, Default)]
pub struct OutputTargets {
    /// Combined chain document (chain config with embedded genesis).
    pub combined: Option<PathBuf>,
    /// Deprecated alias of `combined`; ignored when `combined` is set.
    pub legacy_out: Option<PathBuf>,
    /// Split chain config whose `genesis` is a path.
    pub chain: Option<PathBuf>,
    /// Raw genesis document referenced by the split chain config.
    pub genesis: Option<PathBuf>,
    /// Chain metadata (token passthrough).
    pub metadata: Option<PathBuf>,
}

/// Concrete output locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    /// Combined document.
    pub combined: PathBuf,
    /// Split chain config.
    pub chain: PathBuf,
    /// Raw genesis, absolute.
    pub genesis: PathBuf,
    /// Chain metadata.
    pub metadata: PathBuf,
    /// Resolved PoS contract addresses.
    pub pos_addresses: PathBuf,
}

impl OutputTargets {
    /// Applies defaults: combined `build/genesis.json`, chain next to it as
    /// `chain.json`, and genesis, metadata and PoS addresses next to the chain.
    pub fn resolve(&self) -> Result<ResolvedOutputs, GenesisError> {
        let combined = match (&self.combined, &self.legacy_out) {
            (Some(combined), Some(legacy)) => {
                warn!(
                    combined = %combined.display(),
                    ignored = %legacy.display(),
                    "--out is a deprecated alias of --out-combined; using --out-combined"
                );
                combined.clone()
            }
            (Some(path), None) | (None, Some(path)) => path.clone(),
            (None, None) => Path::new("build").join("genesis.json"),
        };
        let chain = self
            .chain
            .clone()
            .unwrap_or_else(|| sibling(&combined, "chain.json"));
        let genesis = self
            .genesis
            .clone()
            .unwrap_or_else(|| sibling(&chain, "genesis-eth.json"));
        let genesis = std::path::absolute(&genesis).map_err(|e| GenesisError::io(&genesis, e))?;
        let metadata = self
            .metadata
            .clone()
            .unwrap_or_else(|| sibling(&chain, "chain-metadata.json"));
        let pos_addresses = sibling(&chain, "pos-addresses.json");
        Ok(ResolvedOutputs {
            combined,
            chain,
            genesis,
            metadata,
            pos_addresses,
        })
    }
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    path.parent().unwrap_or_else(|| Path::new("")).join(name)
}

/// Everything one genesis build needs. Constructed once, never mutated by
/// the pipeline.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Consensus engine.
    pub consensus: Consensus,
    /// Target environment.
    pub env: Environment,
    /// Base template with placeholders.
    pub template: PathBuf,
    /// Directory holding `<consensus>.json` overlays.
    pub overlay_dir: PathBuf,
    /// Token identity document.
    pub token: PathBuf,
    /// Allocation ledger.
    pub allocations: PathBuf,
    /// PoS deployments file, read for `pos` only.
    pub pos_deployments: PathBuf,
    /// Chain id; must be non-zero.
    pub chain_id: u64,
    /// Block gas limit, e.g. `0x1c9c380`.
    pub gas_limit: String,
    /// Genesis difficulty.
    pub difficulty: String,
    /// Genesis extra data.
    pub extra_data: String,
    /// Minimum gas price in wei.
    pub min_gas_price: String,
    /// Whether EIP-1559 base fee is enabled.
    pub base_fee_enabled: bool,
    /// Fail on unresolved placeholders and legacy keys.
    pub strict: bool,
    /// Accept the legacy top-level consensus schema with a warning.
    pub accept_legacy_consensus: bool,
    /// Fall back to placeholder PoS addresses when deployments are missing.
    pub allow_missing_pos_addresses: bool,
    /// Indented output.
    pub pretty: bool,
    /// Forks the node binary supports; `None` means all catalogue forks.
    pub supported_forks: Option<Vec<String>>,
    /// Output locations.
    pub outputs: OutputTargets,
}

impl Default for BuildOptions {
    fn default() -> Self {
        let config = Path::new("config");
        Self {
            consensus: Consensus::default(),
            env: Environment::default(),
            template: config.join("genesis.template.json"),
            overlay_dir: config.join("consensus"),
            token: config.join("token.json"),
            allocations: config.join("allocations").join("devnet.json"),
            pos_deployments: Path::new("build").join("pos-deployments.json"),
            chain_id: 0,
            gas_limit: "0x1c9c380".to_string(),
            difficulty: "0x1".to_string(),
            extra_data: "0x".to_string(),
            min_gas_price: "0".to_string(),
            base_fee_enabled: false,
            strict: false,
            accept_legacy_consensus: false,
            allow_missing_pos_addresses: false,
            pretty: false,
            supported_forks: None,
            outputs: OutputTargets::default(),
        }
    }
}

impl BuildOptions {
    /// Default allocation ledger location for an environment.
    pub fn default_allocations(env: Environment) -> PathBuf {
        Path::new("config")
            .join("allocations")
            .join(format!("{}.json", env))
    }

    /// Overlay document for the configured consensus.
    pub fn overlay_path(&self) -> PathBuf {
        self.overlay_dir
            .join(format!("{}.json", self.consensus.as_str()))
    }

    /// Rejects option combinations no build can satisfy.
    pub fn check(&self) -> Result<(), GenesisError> {
        if self.chain_id == 0 {
            let hint = if self.env == Environment::Mainnet {
                " (mandatory for mainnet)"
            } else {
                ""
            };
            return Err(GenesisError::InvalidOptions(format!(
                "chain id is required and must be non-zero{}",
                hint
            )));
        }
        Ok(())
    }
}
