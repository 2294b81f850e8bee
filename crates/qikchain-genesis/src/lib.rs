//! Genesis synthesis and validation for qikchain.
//!
//! This crate provides:
//! - Token and allocation-ledger loading with invariant checks
//! - Placeholder resolution, deep merge and fork policy for chain documents
//! - Chain-config and raw-genesis schema validation
//! - The [`build`] pipeline producing combined, split and metadata artifacts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qikchain_genesis::{build, write_outputs, BuildOptions, Consensus};
//!
//! let opts = BuildOptions {
//!     consensus: Consensus::Poa,
//!     chain_id: 100,
//!     ..BuildOptions::default()
//! };
//! let result = build(&opts)?;
//! write_outputs(&result)?;
//! println!("premine: {} QIK", result.total_premine_qik(6));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Key Types
//!
//! - [`BuildOptions`] - Inputs, chain parameters and output locations
//! - [`BuildResult`] - Canonical artifact bytes and digests
//! - [`ValidateResult`] - Accumulated validation errors and warnings

#![deny(missing_docs)]

/// Allocation ledger verification and rendering.
pub mod allocations;
/// Genesis build orchestration.
pub mod build;
/// Input document types and loaders.
pub mod config;
/// Error types for genesis operations.
pub mod errors;
/// Fork activation policy.
pub mod forks;
/// Deep merge of document trees.
pub mod merge;
/// Chain metadata rendering.
pub mod metadata;
/// Build options and output locations.
pub mod options;
/// Placeholder resolution.
pub mod placeholders;
/// Premine report.
pub mod report;
/// Chain-config and raw-genesis validation.
pub mod validation;

pub use allocations::{alloc_document, render_alloc_map, verify, VerifyOptions, VerifySummary};
pub use build::{build, write_outputs, BuildResult, GENESIS_PATH_SENTINEL};
pub use config::{
    load_allocation_config, load_document, load_pos_addresses, load_token_config,
    AllocationConfig, AllocationEntry, AllocationMeta, PosAddresses, TokenConfig,
};
pub use errors::GenesisError;
pub use forks::{active_forks, ensure_params_forks, fork_activations, FORK_CATALOGUE};
pub use merge::deep_merge;
pub use metadata::render_metadata;
pub use options::{BuildOptions, Consensus, Environment, OutputTargets, ResolvedOutputs};
pub use placeholders::{resolve, Placeholders, Resolved};
pub use report::{build_report, format_qik, Report, ReportLine};
pub use validation::{
    validate, validate_chain_config, validate_file, validate_raw_genesis, ValidateOptions,
    ValidateResult, ValidationIssue, LEGACY_TOP_LEVEL_KEYS,
};
