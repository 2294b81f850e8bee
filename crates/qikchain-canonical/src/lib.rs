//! Canonical document primitives for qikchain genesis artifacts.
//!
//! Every artifact the genesis pipeline emits is a [`Document`] serialized by
//! the [`Canonicalizer`]: object keys sorted, one trailing newline, output a
//! pure function of the logical content. The address and wei types here are
//! the only places where ledger values are parsed.
//!
#![deny(missing_docs)]

/// Canonical serialization of documents.
pub mod canonicalizer;
/// SHA-256 fingerprints of artifact bytes.
pub mod digest;
/// Account address newtype.
pub mod identifiers;
/// Dotted paths into a document, used in error messages.
pub mod path;
/// Wei amounts and display-unit formatting.
pub mod quantities;
/// Parse errors for addresses, amounts and digests.
pub mod validation;

pub use canonicalizer::{CanonicalizationError, CanonicalizationResult, Canonicalizer, Layout};
pub use digest::{Digest, DigestAlg};
pub use identifiers::{Address, ZERO_ADDRESS};
pub use path::DocPath;
pub use quantities::{is_digit_string, Wei, WEI_DECIMALS};
pub use validation::ValidationError;

/// Generic JSON document tree every pipeline stage operates on.
pub type Document = serde_json::Value;
