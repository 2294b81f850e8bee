//! Fork activation policy.

use qikchain_canonical::Document;
use serde_json::{json, Map};

use crate::merge::object_entry;
use crate::options::Environment;

/// Forks a devnet activates at genesis, in catalogue order.
pub const FORK_CATALOGUE: &[&str] = &[
    "homestead",
    "byzantium",
    "constantinople",
    "petersburg",
    "istanbul",
    "london",
    "eip150",
    "eip155",
    "eip158",
    "quorumCalcAlignment",
    "txHashWithType",
    "londonFix",
];

/// Catalogue names kept by `supported`, in catalogue order.
///
/// `None` keeps all, and so does a list with no non-empty names: an empty
/// `--supported-forks` means "not supplied", never "no forks".
pub fn active_forks(env: Environment, supported: Option<&[String]>) -> Vec<&'static str> {
    if env != Environment::Devnet {
        return Vec::new();
    }
    let supported = supported.filter(|set| set.iter().any(|s| !s.is_empty()));
    FORK_CATALOGUE
        .iter()
        .copied()
        .filter(|name| supported.map_or(true, |set| set.iter().any(|s| s.as_str() == *name)))
        .collect()
}

/// The `params.forks` object: `{name: {block: 0}}` for each active fork.
/// Non-devnet environments get an empty object, never null.
pub fn fork_activations(env: Environment, supported: Option<&[String]>) -> Document {
    let mut forks = Map::new();
    for name in active_forks(env, supported) {
        forks.insert(name.to_string(), json!({ "block": 0 }));
    }
    Document::Object(forks)
}

/// Installs fork activations under `params.forks` unless the document
/// already carries a non-null forks object. Missing `params` is created.
pub fn ensure_params_forks(doc: &mut Document, env: Environment, supported: Option<&[String]>) {
    let Some(root) = doc.as_object_mut() else {
        return;
    };
    let params = object_entry(root, "params");
    if params.get("forks").is_some_and(Document::is_object) {
        return;
    }
    params.insert("forks".to_string(), fork_activations(env, supported));
}
