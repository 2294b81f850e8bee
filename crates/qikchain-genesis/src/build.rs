//! Genesis build: ledger, template, overlay, forks, validation, output.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use qikchain_canonical::{
    CanonicalizationResult, Canonicalizer, Digest, Document, Layout, Wei,
};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::allocations::{render_alloc_map, verify, VerifyOptions};
use crate::config::{
    load_allocation_config, load_document, load_pos_addresses, load_token_config, PosAddresses,
};
use crate::errors::GenesisError;
use crate::forks::ensure_params_forks;
use crate::merge::{deep_merge, object_entry};
use crate::metadata::render_metadata;
use crate::options::{BuildOptions, Consensus, ResolvedOutputs};
use crate::placeholders::{resolve, Placeholders};
use crate::validation::{
    validate_chain_config, validate_raw_genesis, ValidateOptions, LEGACY_TOP_LEVEL_KEYS,
};

/// Stand-in for the raw-genesis path while the chain config is validated,
/// so a stale file at the real output path cannot affect the build.
pub const GENESIS_PATH_SENTINEL: &str = "__GENESIS_PATH__";

/// Artifacts of one build, ready to be written.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// Chain config with the raw genesis embedded.
    pub combined: CanonicalizationResult,
    /// Chain config whose `genesis` is the absolute raw-genesis path.
    pub chain: CanonicalizationResult,
    /// Raw genesis.
    pub genesis: CanonicalizationResult,
    /// Token metadata passthrough.
    pub metadata: Vec<u8>,
    /// PoS contract addresses, for `pos` builds only.
    pub pos_addresses: Option<PosAddresses>,
    /// Canonical `pos-addresses.json`, for `pos` builds only.
    pub pos_addresses_json: Option<CanonicalizationResult>,
    /// Exact premine total.
    pub total_premine_wei: Wei,
    /// Where [`write_outputs`] puts each artifact.
    pub outputs: ResolvedOutputs,
    /// Validation and placeholder warnings, in the order found.
    pub warnings: Vec<String>,
}

impl BuildResult {
    /// Premine total in display units.
    pub fn total_premine_qik(&self, max_decimals: i32) -> String {
        self.total_premine_wei.format_units(max_decimals)
    }

    /// Digest of every artifact, keyed by artifact name.
    pub fn digests(&self) -> BTreeMap<&'static str, Digest> {
        let mut out = BTreeMap::new();
        out.insert("combined", self.combined.digest.clone());
        out.insert("chain", self.chain.digest.clone());
        out.insert("genesis", self.genesis.digest.clone());
        out.insert("metadata", Digest::sha256(&self.metadata));
        if let Some(pos) = &self.pos_addresses_json {
            out.insert("posAddresses", pos.digest.clone());
        }
        out
    }
}

/// Runs the whole pipeline in memory. Only input files are touched; the
/// same options and inputs always yield byte-identical artifacts.
pub fn build(opts: &BuildOptions) -> Result<BuildResult, GenesisError> {
    opts.check()?;
    let outputs = opts.outputs.resolve()?;
    let mut warnings = Vec::new();

    let token = load_token_config(&opts.token)?;
    token.check_invariants()?;

    let ledger = load_allocation_config(&opts.allocations)?;
    let (summary, issues) = verify(&ledger, &VerifyOptions::default());
    if let Some(first) = issues.first() {
        return Err(GenesisError::AllocationInvariant(format!(
            "{} ({} error(s))",
            first,
            issues.len()
        )));
    }
    let (alloc_bytes, total_premine_wei) = render_alloc_map(&ledger)?;
    info!(
        total_premine_wei = %total_premine_wei,
        addresses = summary.address_count,
        "rendered premine allocations"
    );

    let template = load_document(&opts.template)?;
    let overlay_path = opts.overlay_path();
    let overlay = load_document(&overlay_path)?;
    debug!(template = %opts.template.display(), overlay = %overlay_path.display(), "loaded documents");

    let pos_addresses = match opts.consensus {
        Consensus::Pos => Some(resolve_pos_addresses(opts)?),
        Consensus::Poa => None,
    };
    let values = placeholder_values(opts, &alloc_bytes, pos_addresses.as_ref());

    let template = resolve(template, &values, opts.strict)?;
    let overlay = resolve(overlay, &values, opts.strict)?;
    for name in template.unresolved.iter().chain(overlay.unresolved.iter()) {
        let msg = format!("placeholder {{{{{}}}}} left unresolved", name);
        warn!("{}", msg);
        warnings.push(msg);
    }

    let mut combined = deep_merge(&template.document, &overlay.document);
    strip_legacy_keys(&mut combined);
    apply_engine_overlay(&mut combined, &overlay.document);
    if let Some(msg) = engine_type_mismatch(&combined, opts.consensus) {
        warn!("{}", msg);
        warnings.push(msg);
    }
    ensure_params_forks(&mut combined, opts.env, opts.supported_forks.as_deref());

    let raw_genesis = combined
        .get("genesis")
        .filter(|g| g.is_object())
        .cloned()
        .ok_or(GenesisError::MissingGenesisObject)?;
    let mut chain = combined.clone();
    set_genesis(&mut chain, GENESIS_PATH_SENTINEL);

    let validate_opts = ValidateOptions {
        strict: opts.strict,
        accept_legacy_consensus: opts.accept_legacy_consensus,
    };
    let mut report = validate_chain_config(&chain, &validate_opts);
    report.extend(validate_raw_genesis(&raw_genesis));
    for warning in &report.warnings {
        warn!("genesis build warning: {}", warning);
    }
    warnings.extend(report.warnings.iter().cloned());
    if let Some(err) = report.into_error() {
        return Err(err);
    }
    set_genesis(&mut chain, &outputs.genesis.to_string_lossy());

    let canonicalizer = Canonicalizer::new(Layout::from_pretty(opts.pretty));
    let pos_addresses_json = match &pos_addresses {
        Some(addresses) => Some(Canonicalizer::pretty().canonicalize(&json!({
            "staking": addresses.staking,
            "validatorSet": addresses.validator_set,
        }))?),
        None => None,
    };

    Ok(BuildResult {
        combined: canonicalizer.canonicalize(&combined)?,
        chain: canonicalizer.canonicalize(&chain)?,
        genesis: canonicalizer.canonicalize(&raw_genesis)?,
        metadata: render_metadata(&token)?,
        pos_addresses,
        pos_addresses_json,
        total_premine_wei,
        outputs,
        warnings,
    })
}

/// Writes every artifact, creating parent directories first.
///
/// Files are written one at a time; if a later write fails, earlier files
/// stay on disk.
pub fn write_outputs(result: &BuildResult) -> Result<(), GenesisError> {
    let outputs = &result.outputs;
    write_artifact(&outputs.genesis, &result.genesis.bytes)?;
    write_artifact(&outputs.combined, &result.combined.bytes)?;
    write_artifact(&outputs.chain, &result.chain.bytes)?;
    write_artifact(&outputs.metadata, &result.metadata)?;
    if let Some(pos) = &result.pos_addresses_json {
        write_artifact(&outputs.pos_addresses, &pos.bytes)?;
    }
    Ok(())
}

fn write_artifact(path: &Path, bytes: &[u8]) -> Result<(), GenesisError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| GenesisError::io(parent, e))?;
    }
    let mut file = File::create(path).map_err(|e| GenesisError::io(path, e))?;
    file.write_all(bytes).map_err(|e| GenesisError::io(path, e))?;
    file.flush().map_err(|e| GenesisError::io(path, e))?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
    Ok(())
}

fn resolve_pos_addresses(opts: &BuildOptions) -> Result<PosAddresses, GenesisError> {
    match load_pos_addresses(&opts.pos_deployments) {
        Ok(addresses) => Ok(addresses),
        Err(err) if opts.allow_missing_pos_addresses => {
            warn!(error = %err, "pos deployments unavailable; using placeholder addresses");
            Ok(PosAddresses::placeholders())
        }
        Err(err) => Err(err),
    }
}

/// Replacement text for every placeholder the templates may use. Values that
/// must stay strings are JSON string literals so they are not retyped.
fn placeholder_values(
    opts: &BuildOptions,
    alloc: &[u8],
    pos: Option<&PosAddresses>,
) -> Placeholders {
    let quoted = |s: &str| Document::String(s.to_string()).to_string();
    let mut values = Placeholders::new();
    values.insert("CHAIN_ID".into(), opts.chain_id.to_string());
    values.insert("BLOCK_GAS_LIMIT".into(), quoted(&opts.gas_limit));
    values.insert("GENESIS_DIFFICULTY".into(), quoted(&opts.difficulty));
    values.insert("MIN_GAS_PRICE".into(), quoted(&opts.min_gas_price));
    values.insert("BASE_FEE_ENABLED".into(), opts.base_fee_enabled.to_string());
    values.insert("PREALLOCATIONS".into(), String::from_utf8_lossy(alloc).into_owned());
    values.insert("POS_BLOCK_REWARD".into(), quoted("0"));
    values.insert("VALIDATOR_EXTRA_DATA".into(), quoted(&opts.extra_data));
    if let Some(pos) = pos {
        values.insert("STAKING_ADDRESS".into(), pos.staking.clone());
        values.insert("VALIDATOR_SET_ADDRESS".into(), pos.validator_set.clone());
    }
    values
}

fn strip_legacy_keys(doc: &mut Document) {
    if let Some(root) = doc.as_object_mut() {
        for key in LEGACY_TOP_LEVEL_KEYS {
            root.remove(*key);
        }
    }
}

/// Overlay `params.engine` entries replace the merged ones wholesale, so the
/// consensus overlay alone defines `params.engine.ibft`.
fn apply_engine_overlay(doc: &mut Document, overlay: &Document) {
    let Some(root) = doc.as_object_mut() else {
        return;
    };
    let engine = object_entry(object_entry(root, "params"), "engine");
    if let Some(overlay_engine) = overlay
        .pointer("/params/engine")
        .and_then(Document::as_object)
    {
        for (key, value) in overlay_engine {
            engine.insert(key.clone(), value.clone());
        }
    }
}

fn engine_type_mismatch(doc: &Document, consensus: Consensus) -> Option<String> {
    let found = doc
        .pointer("/params/engine/ibft/type")
        .and_then(Document::as_str)?;
    let expected = consensus.ibft_type();
    (found != expected).then(|| {
        format!(
            "params.engine.ibft.type is {:?} but {} consensus expects {:?}",
            found, consensus, expected
        )
    })
}

fn set_genesis(doc: &mut Document, path: &str) {
    if let Some(root) = doc.as_object_mut() {
        root.insert("genesis".to_string(), Document::String(path.to_string()));
    }
}
