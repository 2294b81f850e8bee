//! Schema checks for chain-config and raw-genesis documents.
//!
//! Every check runs; problems accumulate into a [`ValidateResult`] so a
//! caller can report all of them in one pass.

use std::fmt;
use std::path::Path;

use qikchain_canonical::{is_digit_string, Address, DocPath, Document};
use serde_json::Map;
use tracing::debug;

use crate::config::load_document;
use crate::errors::GenesisError;

/// Deprecated top-level keys superseded by `params.engine.ibft`.
pub const LEGACY_TOP_LEVEL_KEYS: &[&str] = &["consensus", "consensusMode", "pos", "consensusRaw"];

/// Policy for chain-config validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Escalate legacy top-level keys from warnings to errors.
    pub strict: bool,
    /// Accept a missing `params.engine.ibft` when top-level
    /// `consensus.type` is `ibft`.
    pub accept_legacy_consensus: bool,
}

/// One schema violation, located by document path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path of the offending value; empty for document-level issues.
    pub path: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationIssue {
    /// Creates an issue.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Accumulated errors and warnings, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidateResult {
    /// Violations.
    pub errors: Vec<ValidationIssue>,
    /// Non-fatal findings.
    pub warnings: Vec<String>,
}

impl ValidateResult {
    /// True when no errors were recorded.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Appends another result's findings after this one's.
    pub fn extend(&mut self, other: ValidateResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Converts into a build failure carrying the first error.
    pub fn into_error(self) -> Option<GenesisError> {
        let total = self.errors.len();
        self.errors
            .into_iter()
            .next()
            .map(|first| GenesisError::Validation {
                first: first.to_string(),
                total,
            })
    }

    fn error(&mut self, path: &DocPath, message: impl Into<String>) {
        let path = if path.is_root() {
            String::new()
        } else {
            path.to_string()
        };
        self.errors.push(ValidationIssue::new(path, message));
    }
}

/// Validates `doc` as raw genesis when it has a top-level `alloc`, as chain
/// config otherwise.
pub fn validate(doc: &Document, opts: &ValidateOptions) -> ValidateResult {
    if doc.get("alloc").is_some() {
        validate_raw_genesis(doc)
    } else {
        validate_chain_config(doc, opts)
    }
}

/// Loads a JSON file and runs [`validate`] on it.
pub fn validate_file(
    path: impl AsRef<Path>,
    opts: &ValidateOptions,
) -> Result<ValidateResult, GenesisError> {
    let doc = load_document(path)?;
    Ok(validate(&doc, opts))
}

/// Chain-config rules: params, forks, engine, and the genesis reference.
pub fn validate_chain_config(doc: &Document, opts: &ValidateOptions) -> ValidateResult {
    let mut res = ValidateResult::default();
    let root = DocPath::root();
    let Some(top) = doc.as_object() else {
        res.error(&root, "chain config must be a JSON object");
        return res;
    };

    let legacy: Vec<&str> = LEGACY_TOP_LEVEL_KEYS
        .iter()
        .copied()
        .filter(|key| top.contains_key(*key))
        .collect();
    if !legacy.is_empty() {
        let msg = format!(
            "legacy top-level key(s) present: {}; migrate to params.engine.ibft",
            legacy.join(", ")
        );
        if opts.strict {
            res.error(&root, msg);
        } else {
            res.warnings.push(msg);
        }
    }

    let params_path = root.push_field("params");
    match top.get("params").and_then(Document::as_object) {
        None => res.error(&params_path, "object is required"),
        Some(params) => check_params(top, params, &params_path, opts, &mut res),
    }

    let genesis_path = root.push_field("genesis");
    match top.get("genesis") {
        None => res.error(&genesis_path, "is required"),
        Some(embedded @ Document::Object(_)) => raw_genesis_at(embedded, &genesis_path, &mut res),
        Some(Document::String(file)) if !file.trim().is_empty() => {
            check_genesis_file(Path::new(file), &genesis_path, &mut res);
        }
        Some(_) => res.error(
            &genesis_path,
            "must be an embedded object or a non-empty string path",
        ),
    }

    res
}

fn check_params(
    top: &Map<String, Document>,
    params: &Map<String, Document>,
    path: &DocPath,
    opts: &ValidateOptions,
    res: &mut ValidateResult,
) {
    let numeric = |key: &str| params.get(key).is_some_and(Document::is_number);
    if !numeric("chainID") && !numeric("chainId") {
        res.error(
            &path.push_field("chainID"),
            "must be numeric (params.chainId is also accepted)",
        );
    }

    if !params.contains_key("minGasPrice") {
        res.warnings
            .push("params.minGasPrice is recommended".to_string());
    }

    let forks_path = path.push_field("forks");
    match params.get("forks").and_then(Document::as_object) {
        None => res.error(&forks_path, "must be a non-null object"),
        Some(forks) => {
            for (name, fork) in forks {
                if !fork.is_object() {
                    res.error(
                        &forks_path.push_field(name),
                        "must be an object such as {\"block\": 0}",
                    );
                }
            }
        }
    }

    let engine_path = path.push_field("engine");
    let Some(engine) = params.get("engine").and_then(Document::as_object) else {
        res.error(&engine_path, "must be an object");
        return;
    };
    let ibft_path = engine_path.push_field("ibft");
    match engine.get("ibft").and_then(Document::as_object) {
        Some(ibft) => {
            let type_path = ibft_path.push_field("type");
            match ibft.get("type") {
                None => res.error(&type_path, "is required"),
                Some(Document::String(t)) if t.is_empty() => res.error(&type_path, "is required"),
                Some(Document::String(t)) if t == "PoA" || t == "PoS" => {}
                Some(_) => res.error(&type_path, "must be \"PoA\" or \"PoS\""),
            }
        }
        None => {
            let legacy_ibft = top
                .get("consensus")
                .and_then(|c| c.get("type"))
                .and_then(Document::as_str)
                .is_some_and(|t| t.eq_ignore_ascii_case("ibft"));
            if opts.accept_legacy_consensus && legacy_ibft {
                res.warnings.push(
                    "legacy consensus schema accepted; migrate to params.engine.ibft".to_string(),
                );
            } else {
                res.error(&ibft_path, "must be an object");
            }
        }
    }
}

fn check_genesis_file(file: &Path, path: &DocPath, res: &mut ValidateResult) {
    if !file.is_file() {
        debug!(genesis = %file.display(), "referenced genesis file not present; skipping");
        return;
    }
    match load_document(file) {
        Ok(doc) => {
            let nested = validate_raw_genesis(&doc);
            res.warnings.extend(nested.warnings);
            res.errors.extend(nested.errors.into_iter().map(|issue| {
                ValidationIssue::new(
                    issue.path,
                    format!("{} (in {})", issue.message, file.display()),
                )
            }));
        }
        Err(err) => res.error(path, format!("failed to load genesis file: {}", err)),
    }
}

/// Raw-genesis rules: `alloc` entries plus the required top-level scalars.
pub fn validate_raw_genesis(doc: &Document) -> ValidateResult {
    let mut res = ValidateResult::default();
    raw_genesis_at(doc, &DocPath::root(), &mut res);
    res
}

fn raw_genesis_at(doc: &Document, prefix: &DocPath, res: &mut ValidateResult) {
    let Some(top) = doc.as_object() else {
        res.error(prefix, "genesis must be a JSON object");
        return;
    };

    let alloc_path = prefix.push_field("alloc");
    match top.get("alloc").and_then(Document::as_object) {
        None => res.error(&alloc_path, "must be an object"),
        Some(alloc) => {
            for (address, entry) in alloc {
                let entry_path = alloc_path.push_field(address);
                if !Address::is_valid(address) {
                    res.error(&entry_path, "key is not an address");
                }
                match entry.as_object() {
                    None => res.error(&entry_path, "must be an object"),
                    Some(entry) => {
                        let ok = entry
                            .get("balance")
                            .and_then(Document::as_str)
                            .is_some_and(is_digit_string);
                        if !ok {
                            res.error(
                                &entry_path.push_field("balance"),
                                "must be a non-negative base-10 digit string",
                            );
                        }
                    }
                }
            }
        }
    }

    for field in ["gasLimit", "difficulty", "extraData"] {
        if !top.get(field).is_some_and(Document::is_string) {
            res.error(&prefix.push_field(field), "is required and must be a string");
        }
    }
    if !top.get("baseFeeEnabled").is_some_and(Document::is_boolean) {
        res.error(
            &prefix.push_field("baseFeeEnabled"),
            "is required and must be a boolean",
        );
    }
}
