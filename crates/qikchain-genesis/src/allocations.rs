//! Allocation ledger verification and rendering.

use std::collections::BTreeMap;

use qikchain_canonical::{Address, Canonicalizer, DocPath, Document, ValidationError, Wei};
use serde_json::{json, Map};
use tracing::debug;

use crate::config::{AllocationConfig, AllocationEntry, ALLOCATION_UNIT, TOKEN_DECIMALS, TOKEN_SYMBOL};
use crate::errors::GenesisError;
use crate::validation::ValidationIssue;

/// Knobs for [`verify`].
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Accept `0x000…000` as an allocation address.
    pub allow_zero_address: bool,
    /// Symbol `meta.token` must carry.
    pub expected_token: String,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            allow_zero_address: false,
            expected_token: TOKEN_SYMBOL.to_string(),
        }
    }
}

/// Counts gathered while verifying a ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifySummary {
    /// Buckets inspected.
    pub bucket_count: usize,
    /// Operators inspected.
    pub operator_count: usize,
    /// Distinct valid addresses seen.
    pub address_count: usize,
}

/// Every entry of the ledger with its document path: buckets by name, then
/// operators in file order, then the deployer.
pub(crate) fn entries(config: &AllocationConfig) -> Vec<(DocPath, &AllocationEntry)> {
    let buckets = DocPath::root().push_field("buckets");
    let operators = DocPath::root().push_field("operators");
    let mut out = Vec::with_capacity(config.buckets.len() + config.operators.len() + 1);
    for (name, entry) in &config.buckets {
        out.push((buckets.push_field(name), entry));
    }
    for (idx, entry) in config.operators.iter().enumerate() {
        out.push((operators.push_index(idx), entry));
    }
    out.push((DocPath::root().push_field("deployer"), &config.deployer));
    out
}

/// Checks the ledger and returns every problem found, in a stable order.
///
/// Nothing short-circuits: a malformed meta block does not hide address or
/// amount problems further down.
pub fn verify(
    config: &AllocationConfig,
    opts: &VerifyOptions,
) -> (VerifySummary, Vec<ValidationIssue>) {
    let mut issues = Vec::new();
    let mut summary = VerifySummary {
        bucket_count: config.buckets.len(),
        operator_count: config.operators.len(),
        address_count: 0,
    };

    if config.meta.unit != ALLOCATION_UNIT {
        issues.push(ValidationIssue::new(
            "meta.unit",
            format!("must be {}", ALLOCATION_UNIT),
        ));
    }
    if config.meta.decimals != TOKEN_DECIMALS {
        issues.push(ValidationIssue::new(
            "meta.decimals",
            format!("must be {}", TOKEN_DECIMALS),
        ));
    }
    if config.meta.token != opts.expected_token {
        issues.push(ValidationIssue::new(
            "meta.token",
            format!("must be {}", opts.expected_token),
        ));
    }
    if config.buckets.is_empty() {
        issues.push(ValidationIssue::new("buckets", "must not be empty"));
    }

    let mut seen: BTreeMap<Address, String> = BTreeMap::new();
    for (path, entry) in entries(config) {
        let address_path = path.push_field("address").to_string();
        match normalize_address(&entry.address, opts.allow_zero_address) {
            Err(message) => issues.push(ValidationIssue::new(&address_path, message)),
            Ok(address) => {
                if let Some(first) = seen.get(&address) {
                    issues.push(ValidationIssue::new(
                        &address_path,
                        format!("duplicates {} ({})", first, address),
                    ));
                } else {
                    seen.insert(address, address_path);
                    summary.address_count += 1;
                }
            }
        }
        if let Err(err) = Wei::parse(&entry.amount) {
            issues.push(ValidationIssue::new(
                path.push_field("amount").to_string(),
                amount_message(&err),
            ));
        }
    }

    debug!(
        buckets = summary.bucket_count,
        operators = summary.operator_count,
        addresses = summary.address_count,
        issues = issues.len(),
        "verified allocation ledger"
    );
    (summary, issues)
}

/// Renders `{address: {balance}}` for every entry, keys sorted, together with
/// the exact premine total.
///
/// The bytes depend only on the multiset of entries, never on bucket or
/// operator order. Callers are expected to have run [`verify`] first.
pub fn render_alloc_map(config: &AllocationConfig) -> Result<(Vec<u8>, Wei), GenesisError> {
    let (document, total) = alloc_document(config)?;
    let bytes = Canonicalizer::pretty().to_bytes(&document)?;
    Ok((bytes, total))
}

/// Same as [`render_alloc_map`] but returns the document tree.
pub fn alloc_document(config: &AllocationConfig) -> Result<(Document, Wei), GenesisError> {
    let mut alloc = Map::new();
    let mut total = Wei::zero();
    for (path, entry) in entries(config) {
        let address = Address::parse(&entry.address).map_err(|e| {
            GenesisError::AllocationInvariant(format!("{}.address: {}", path, e))
        })?;
        let amount = Wei::parse(&entry.amount).map_err(|e| {
            GenesisError::AllocationInvariant(format!("{}.amount: {}", path, e))
        })?;
        total += &amount;
        alloc.insert(
            address.to_string(),
            json!({ "balance": amount.to_string() }),
        );
    }
    Ok((Document::Object(alloc), total))
}

fn normalize_address(value: &str, allow_zero: bool) -> Result<Address, String> {
    if value.is_empty() {
        return Err("is required".to_string());
    }
    let address = Address::parse(value).map_err(|_| "must be 0x + 40 hex chars".to_string())?;
    if !allow_zero && address.is_zero() {
        return Err("zero address is not allowed".to_string());
    }
    Ok(address)
}

fn amount_message(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::Negative { .. } => "must be non-negative",
        ValidationError::Malformed { .. } => "must be a base-10 integer string",
    }
}
