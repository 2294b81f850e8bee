//! Canonicalize command implementation.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use qikchain_canonical::{Canonicalizer, Layout};
use serde_json::Value;

use crate::errors::CliError;

pub fn run(input: Option<PathBuf>, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let canonicalizer = Canonicalizer::new(Layout::from_pretty(pretty));

    // Read JSON from file or stdin
    let json_str = if let Some(path) = input {
        std::fs::read_to_string(&path).map_err(|source| CliError::ReadInput { path, source })?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };

    let value: Value = serde_json::from_str(&json_str).map_err(CliError::InvalidJson)?;
    let result = canonicalizer.canonicalize(&value)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(&result.bytes)?;
    stdout.flush()?;
    tracing::info!(digest = %result.digest, "canonicalized input");
    Ok(())
}
