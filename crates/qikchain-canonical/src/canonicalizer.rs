use serde_json::Value;

use crate::digest::Digest;
use crate::path::DocPath;

/// Spaces added per nesting level in [`Layout::Pretty`].
pub const INDENT_STEP: usize = 2;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// A scalar could not be encoded as JSON.
    #[error("failed to encode scalar at {path}: {source}")]
    Scalar {
        /// Location of the offending scalar.
        path: String,
        /// Underlying encoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// Whitespace layout of canonical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// No insignificant whitespace.
    #[default]
    Compact,
    /// One object member per line, indented by [`INDENT_STEP`] per level.
    /// Array elements are written inline.
    Pretty,
}

impl Layout {
    /// Picks [`Layout::Pretty`] when `pretty` is set.
    pub fn from_pretty(pretty: bool) -> Self {
        if pretty {
            Layout::Pretty
        } else {
            Layout::Compact
        }
    }
}

/// Result of canonicalization.
#[derive(Debug, Clone)]
pub struct CanonicalizationResult {
    /// Canonical UTF-8 bytes, always ending in exactly one newline.
    pub bytes: Vec<u8>,
    /// Digest of `bytes`.
    pub digest: Digest,
}

/// Canonicalizer that emits deterministic bytes.
///
/// Object members are written in ascending byte order of their keys no matter
/// how the input map was built, array elements keep their order, and scalars
/// use the standard JSON encoding. Two logically equal documents therefore
/// always produce identical bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer {
    layout: Layout,
}

impl Canonicalizer {
    /// Creates a new canonicalizer for the provided layout.
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Canonicalizer without whitespace.
    pub fn compact() -> Self {
        Self::new(Layout::Compact)
    }

    /// Canonicalizer with indentation.
    pub fn pretty() -> Self {
        Self::new(Layout::Pretty)
    }

    /// Produces canonical bytes plus their digest.
    pub fn canonicalize(
        &self,
        value: &Value,
    ) -> Result<CanonicalizationResult, CanonicalizationError> {
        let bytes = self.to_bytes(value)?;
        let digest = Digest::sha256(&bytes);
        Ok(CanonicalizationResult { bytes, digest })
    }

    /// Produces canonical bytes only.
    pub fn to_bytes(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        let mut out = Vec::new();
        self.write_value(&mut out, value, 0, &DocPath::root())?;
        out.push(b'\n');
        Ok(out)
    }

    fn write_value(
        &self,
        out: &mut Vec<u8>,
        value: &Value,
        depth: usize,
        path: &DocPath,
    ) -> Result<(), CanonicalizationError> {
        match value {
            Value::Object(map) => {
                if map.is_empty() {
                    out.extend_from_slice(b"{}");
                    return Ok(());
                }
                // serde_json may be built with `preserve_order`; never trust map order.
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                out.push(b'{');
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        out.push(b',');
                    }
                    self.break_line(out, depth + 1);
                    let child_path = path.push_field(key);
                    write_scalar(out, &Value::String(key.clone()), &child_path)?;
                    out.push(b':');
                    if self.layout == Layout::Pretty {
                        out.push(b' ');
                    }
                    self.write_value(out, &map[key], depth + 1, &child_path)?;
                }
                self.break_line(out, depth);
                out.push(b'}');
                Ok(())
            }
            Value::Array(items) => {
                // Arrays stay on one line in every layout; nested objects
                // still indent relative to the array's own level.
                out.push(b'[');
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        out.push(b',');
                    }
                    self.write_value(out, item, depth, &path.push_index(idx))?;
                }
                out.push(b']');
                Ok(())
            }
            Value::Number(num) => {
                if let Some(f) = num.as_f64().filter(|_| num.is_f64()) {
                    if !f.is_finite() {
                        return Err(CanonicalizationError::NonFiniteNumber(path.to_string()));
                    }
                }
                write_scalar(out, value, path)
            }
            Value::String(_) | Value::Bool(_) | Value::Null => write_scalar(out, value, path),
        }
    }

    fn break_line(&self, out: &mut Vec<u8>, depth: usize) {
        if self.layout == Layout::Pretty {
            out.push(b'\n');
            out.extend(std::iter::repeat(b' ').take(depth * INDENT_STEP));
        }
    }
}

fn write_scalar(
    out: &mut Vec<u8>,
    value: &Value,
    path: &DocPath,
) -> Result<(), CanonicalizationError> {
    serde_json::to_writer(&mut *out, value).map_err(|source| CanonicalizationError::Scalar {
        path: path.to_string(),
        source,
    })
}
