//! Allocations verify command implementation.

use std::path::PathBuf;

use qikchain_genesis::{load_allocation_config, verify, VerifyOptions};

use crate::errors::CliError;

pub fn run(file: PathBuf, allow_zero_address: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_allocation_config(&file)?;
    let opts = VerifyOptions {
        allow_zero_address,
        ..VerifyOptions::default()
    };
    let (summary, issues) = verify(&config, &opts);

    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("- {}", issue);
        }
        return Err(CliError::Failed {
            what: "allocation verification",
            count: issues.len(),
        }
        .into());
    }

    println!(
        "OK: {} bucket(s), {} operator(s), {} unique address(es)",
        summary.bucket_count, summary.operator_count, summary.address_count
    );
    Ok(())
}
