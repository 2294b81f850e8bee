//! Structural merge of document trees.

use qikchain_canonical::Document;
use serde_json::Map;

/// Merges `overlay` onto `base` and returns a new tree; neither input is
/// modified.
///
/// Objects present on both sides under the same key merge recursively. Any
/// other overlay value, arrays included, replaces the base value wholesale.
/// Keys missing from the overlay keep their base value.
pub fn deep_merge(base: &Document, overlay: &Document) -> Document {
    match (base, overlay) {
        (Document::Object(base_map), Document::Object(overlay_map)) => {
            let mut out = base_map.clone();
            for (key, overlay_value) in overlay_map {
                let merged = match out.get(key) {
                    Some(base_value) if base_value.is_object() && overlay_value.is_object() => {
                        deep_merge(base_value, overlay_value)
                    }
                    _ => overlay_value.clone(),
                };
                out.insert(key.clone(), merged);
            }
            Document::Object(out)
        }
        _ => overlay.clone(),
    }
}

/// Object stored under `key`, created (or replacing a non-object) if needed.
pub(crate) fn object_entry<'a>(
    map: &'a mut Map<String, Document>,
    key: &str,
) -> &'a mut Map<String, Document> {
    let slot = map
        .entry(key.to_string())
        .or_insert_with(|| Document::Object(Map::new()));
    if !slot.is_object() {
        *slot = Document::Object(Map::new());
    }
    match slot {
        Document::Object(inner) => inner,
        _ => unreachable!("slot was just made an object"),
    }
}
