//! Chain metadata passthrough.

use crate::config::TokenConfig;
use crate::errors::GenesisError;

/// Re-serializes the token document unchanged: declared field order,
/// two-space indentation, one trailing newline.
pub fn render_metadata(token: &TokenConfig) -> Result<Vec<u8>, GenesisError> {
    let mut out = serde_json::to_vec_pretty(token)?;
    out.push(b'\n');
    Ok(out)
}
