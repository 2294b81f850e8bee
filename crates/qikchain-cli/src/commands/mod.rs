pub mod allocations_report;
pub mod allocations_verify;
pub mod canonicalize;
pub mod genesis_build;
pub mod genesis_validate;
