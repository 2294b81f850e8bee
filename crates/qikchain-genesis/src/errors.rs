use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a genesis pipeline operation.
#[derive(Error, Debug)]
pub enum GenesisError {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A file did not contain the expected JSON.
    #[error("parse {}: {source}", path.display())]
    Parse {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// Token config violates a product invariant.
    #[error("token config invariant violated: {0}")]
    TokenInvariant(String),
    /// Allocation config failed verification; carries the first problem.
    #[error("allocation verification failed: {0}")]
    AllocationInvariant(String),
    /// Placeholders left unresolved in strict mode, sorted by name.
    #[error("unresolved placeholders: {}", .0.join(", "))]
    UnresolvedPlaceholders(Vec<String>),
    /// PoS deployment addresses are unavailable.
    #[error("pos deployments: {0}")]
    PosDeployments(String),
    /// The merged document has no embedded genesis object.
    #[error("genesis object is required")]
    MissingGenesisObject,
    /// Schema validation produced errors; carries the first one.
    #[error("genesis validation failed: {first} ({total} error(s))")]
    Validation {
        /// First error in document order.
        first: String,
        /// Number of errors found.
        total: usize,
    },
    /// Build options are unusable.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    /// Encoding a typed value as JSON failed.
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    /// Canonical serialization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] qikchain_canonical::CanonicalizationError),
}

impl GenesisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenesisError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        GenesisError::Parse {
            path: path.into(),
            source,
        }
    }
}
