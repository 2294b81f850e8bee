//! Typed views of the JSON input documents.

use std::collections::BTreeMap;
use std::path::Path;

use qikchain_canonical::Document;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::GenesisError;

/// Symbol and name the token document must carry.
pub const TOKEN_SYMBOL: &str = "QIK";
/// Display name of the token.
pub const TOKEN_NAME: &str = "QIK";
/// Decimals of the token and of allocation amounts.
pub const TOKEN_DECIMALS: i64 = 18;
/// Only supported supply policy.
pub const SUPPLY_POLICY_FIXED: &str = "fixed";
/// Unit allocation amounts are denominated in.
pub const ALLOCATION_UNIT: &str = "wei";

/// Token identity document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenConfig {
    /// Token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Display decimals.
    pub decimals: i64,
    /// Supply policy identifier.
    pub supply_policy: String,
    /// Phase-1 proof-of-stake rewards, as a decimal string.
    pub phase1_pos_rewards: String,
}

impl TokenConfig {
    /// Enforces the product invariants: QIK/QIK, 18 decimals, fixed supply,
    /// no phase-1 staking rewards. Stops at the first violation.
    pub fn check_invariants(&self) -> Result<(), GenesisError> {
        if self.symbol != TOKEN_SYMBOL || self.name != TOKEN_NAME || self.decimals != TOKEN_DECIMALS
        {
            return Err(GenesisError::TokenInvariant(format!(
                "token config must represent {} with {} decimals, got name {:?} symbol {:?} decimals {}",
                TOKEN_SYMBOL, TOKEN_DECIMALS, self.name, self.symbol, self.decimals
            )));
        }
        if self.supply_policy != SUPPLY_POLICY_FIXED {
            return Err(GenesisError::TokenInvariant(format!(
                "supplyPolicy must be {}, got {:?}",
                SUPPLY_POLICY_FIXED, self.supply_policy
            )));
        }
        if self.phase1_pos_rewards != "0" {
            return Err(GenesisError::TokenInvariant(format!(
                "phase1PosRewards must be 0, got {:?}",
                self.phase1_pos_rewards
            )));
        }
        Ok(())
    }
}

/// Single allocation: an address and a wei amount string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationEntry {
    /// `0x`-prefixed 40-hex-digit address, any case.
    pub address: String,
    /// Base-10 wei amount.
    pub amount: String,
}

impl AllocationEntry {
    /// Convenience constructor.
    pub fn new(address: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            amount: amount.into(),
        }
    }
}

/// Header of the allocation ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationMeta {
    /// Amount unit; must be `wei`.
    pub unit: String,
    /// Amount decimals; must be 18.
    pub decimals: i64,
    /// Token symbol the ledger belongs to.
    pub token: String,
}

/// Token allocation ledger.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Ledger header.
    pub meta: AllocationMeta,
    /// Named buckets; names are unique and their order carries no meaning.
    pub buckets: BTreeMap<String, AllocationEntry>,
    /// Operator allocations in file order.
    pub operators: Vec<AllocationEntry>,
    /// Contract deployer allocation.
    pub deployer: AllocationEntry,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeployedContract {
    address: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PosDeploymentsFile {
    staking: DeployedContract,
    validator_set: DeployedContract,
}

/// Staking and validator-set contract addresses for PoS chains.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosAddresses {
    /// Staking contract address.
    pub staking: String,
    /// Validator-set contract address.
    pub validator_set: String,
}

impl PosAddresses {
    /// Literal placeholder tokens used when deployments are unavailable.
    pub fn placeholders() -> Self {
        Self {
            staking: "{{STAKING_ADDRESS}}".to_string(),
            validator_set: "{{VALIDATOR_SET_ADDRESS}}".to_string(),
        }
    }
}

/// Reads a JSON document of any shape.
pub fn load_document(path: impl AsRef<Path>) -> Result<Document, GenesisError> {
    load_json(path.as_ref())
}

/// Reads the token identity document.
pub fn load_token_config(path: impl AsRef<Path>) -> Result<TokenConfig, GenesisError> {
    load_json(path.as_ref())
}

/// Reads the allocation ledger.
pub fn load_allocation_config(path: impl AsRef<Path>) -> Result<AllocationConfig, GenesisError> {
    load_json(path.as_ref())
}

/// Reads a deployments file; addresses are lowercased and both are required.
pub fn load_pos_addresses(path: impl AsRef<Path>) -> Result<PosAddresses, GenesisError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| {
        GenesisError::PosDeployments(format!("read {}: {}", path.display(), e))
    })?;
    let doc: PosDeploymentsFile = serde_json::from_slice(&data).map_err(|e| {
        GenesisError::PosDeployments(format!("parse {}: {}", path.display(), e))
    })?;
    let addresses = PosAddresses {
        staking: doc.staking.address.to_ascii_lowercase(),
        validator_set: doc.validator_set.address.to_ascii_lowercase(),
    };
    if addresses.staking.is_empty() || addresses.validator_set.is_empty() {
        return Err(GenesisError::PosDeployments(format!(
            "{} is missing staking/validatorSet addresses",
            path.display()
        )));
    }
    Ok(addresses)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, GenesisError> {
    let data = std::fs::read(path).map_err(|e| GenesisError::io(path, e))?;
    serde_json::from_slice(&data).map_err(|e| GenesisError::parse(path, e))
}
