//! Genesis validate command implementation.

use std::path::PathBuf;

use qikchain_genesis::{validate_file, ValidateOptions};

use crate::errors::CliError;
use crate::output::{format_json, print_findings, validation_json};

pub fn run(
    file: PathBuf,
    strict: bool,
    accept_legacy_consensus: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let opts = ValidateOptions {
        strict,
        accept_legacy_consensus,
    };
    let res = validate_file(&file, &opts)?;

    if json_output {
        println!("{}", format_json(&validation_json(&res)));
    } else {
        print_findings(&res);
        if res.is_ok() {
            println!("OK: {} is valid", file.display());
        }
    }

    if !res.is_ok() {
        return Err(CliError::Failed {
            what: "validation",
            count: res.errors.len(),
        }
        .into());
    }
    Ok(())
}
