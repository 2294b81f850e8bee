use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by CLI commands on top of library errors.
#[derive(Error, Debug)]
pub enum CliError {
    /// Input could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Input is not JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// A document or ledger had errors; details were already printed.
    #[error("{what} failed with {count} error(s)")]
    Failed { what: &'static str, count: usize },
}
