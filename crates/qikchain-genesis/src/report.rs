//! Human-readable premine report.

use qikchain_canonical::{Address, Wei};
use serde::Serialize;

use crate::config::{AllocationConfig, AllocationEntry, TokenConfig};
use crate::errors::GenesisError;

const SUPPLY_POLICY_NOTE: &str = "fixed supply => premine total is total supply if no inflation";

/// One allocation as shown in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    /// Bucket name, `operator`, or `deployer`.
    pub name: String,
    /// Normalized address.
    pub address: String,
    /// Amount in wei.
    pub wei: String,
    /// Amount in display units.
    pub qik: String,
}

/// Premine breakdown with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Token the ledger belongs to.
    pub token: TokenConfig,
    /// Buckets sorted by name.
    pub buckets: Vec<ReportLine>,
    /// Operators sorted by normalized address.
    pub operators: Vec<ReportLine>,
    /// Deployer allocation.
    pub deployer: ReportLine,
    /// Sum of all amounts in wei.
    pub total_premine_wei: String,
    /// Sum of all amounts in display units.
    #[serde(rename = "totalPremineQIK")]
    pub total_premine_qik: String,
    /// Reminder of what the total means under the supply policy.
    #[serde(rename = "supplyPolicyNote")]
    pub supply_policy_note: String,
}

/// Formats a wei amount in QIK; see [`Wei::format_units`].
pub fn format_qik(wei: &Wei, max_decimals: i32) -> String {
    wei.format_units(max_decimals)
}

/// Builds the report. Amounts and addresses must already be valid.
pub fn build_report(
    config: &AllocationConfig,
    token: &TokenConfig,
    max_decimals: i32,
) -> Result<Report, GenesisError> {
    let mut total = Wei::zero();
    let mut line = |name: &str, path: String, entry: &AllocationEntry| {
        let address = Address::parse(&entry.address).map_err(|e| {
            GenesisError::AllocationInvariant(format!("{}.address: {}", path, e))
        })?;
        let amount = Wei::parse(&entry.amount).map_err(|e| {
            GenesisError::AllocationInvariant(format!("{}.amount: {}", path, e))
        })?;
        total += &amount;
        Ok::<_, GenesisError>(ReportLine {
            name: name.to_string(),
            address: address.to_string(),
            wei: amount.to_string(),
            qik: format_qik(&amount, max_decimals),
        })
    };

    // BTreeMap iteration is already sorted by bucket name.
    let mut buckets = Vec::with_capacity(config.buckets.len());
    for (name, entry) in &config.buckets {
        buckets.push(line(name, format!("buckets.{}", name), entry)?);
    }

    let mut operators = Vec::with_capacity(config.operators.len());
    for (idx, entry) in config.operators.iter().enumerate() {
        operators.push(line("operator", format!("operators[{}]", idx), entry)?);
    }
    operators.sort_by(|a, b| a.address.cmp(&b.address));

    let deployer = line("deployer", "deployer".to_string(), &config.deployer)?;

    Ok(Report {
        token: token.clone(),
        buckets,
        operators,
        deployer,
        total_premine_wei: total.to_string(),
        total_premine_qik: format_qik(&total, max_decimals),
        supply_policy_note: SUPPLY_POLICY_NOTE.to_string(),
    })
}
