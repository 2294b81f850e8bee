//! `{{NAME}}` substitution inside document string leaves.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use qikchain_canonical::Document;
use regex::{Captures, Regex};

use crate::errors::GenesisError;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z0-9_]+)\}\}").expect("invalid regex"));

/// Placeholder name to replacement text.
pub type Placeholders = BTreeMap<String, String>;

/// Outcome of a resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// Document with every resolvable token substituted.
    pub document: Document,
    /// Names that had no replacement, sorted and deduplicated.
    pub unresolved: Vec<String>,
}

/// Substitutes placeholders throughout `document`.
///
/// A string that is exactly one token becomes the replacement parsed as JSON
/// when it parses (so `"{{CHAIN_ID}}"` can become a number) and the literal
/// replacement text otherwise. Tokens embedded in longer strings are replaced
/// textually in a single pass. With `strict`, any unresolved name fails the
/// call; without it, unresolved tokens stay in the output verbatim.
pub fn resolve(
    mut document: Document,
    values: &Placeholders,
    strict: bool,
) -> Result<Resolved, GenesisError> {
    let mut unresolved = BTreeSet::new();
    walk(&mut document, values, &mut unresolved);
    let unresolved: Vec<String> = unresolved.into_iter().collect();
    if strict && !unresolved.is_empty() {
        return Err(GenesisError::UnresolvedPlaceholders(unresolved));
    }
    Ok(Resolved {
        document,
        unresolved,
    })
}

fn walk(node: &mut Document, values: &Placeholders, unresolved: &mut BTreeSet<String>) {
    match node {
        Document::Object(map) => {
            for child in map.values_mut() {
                walk(child, values, unresolved);
            }
        }
        Document::Array(items) => {
            for child in items.iter_mut() {
                walk(child, values, unresolved);
            }
        }
        Document::String(text) => {
            if let Some(replacement) = substitute(text, values, unresolved) {
                *node = replacement;
            }
        }
        Document::Number(_) | Document::Bool(_) | Document::Null => {}
    }
}

fn substitute(
    text: &str,
    values: &Placeholders,
    unresolved: &mut BTreeSet<String>,
) -> Option<Document> {
    let mut tokens = PLACEHOLDER.captures_iter(text);
    let first = tokens.next()?;
    let whole_string = first.get(0).is_some_and(|m| m.as_str() == text);

    if whole_string {
        let name = &first[1];
        return match values.get(name) {
            Some(value) => Some(
                serde_json::from_str(value).unwrap_or_else(|_| Document::String(value.clone())),
            ),
            None => {
                unresolved.insert(name.to_string());
                None
            }
        };
    }

    let replaced = PLACEHOLDER.replace_all(text, |caps: &Captures| match values.get(&caps[1]) {
        Some(value) => value.clone(),
        None => {
            unresolved.insert(caps[1].to_string());
            caps[0].to_string()
        }
    });
    Some(Document::String(replaced.into_owned()))
}
