//! Allocations report command implementation.

use std::path::PathBuf;

use qikchain_genesis::{
    build_report, load_allocation_config, load_token_config, verify, VerifyOptions,
};

use crate::errors::CliError;
use crate::output::{format_table_row, print_table_header};

pub fn run(
    file: PathBuf,
    token: PathBuf,
    max_decimals: i32,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let token = load_token_config(&token)?;
    token.check_invariants()?;
    let config = load_allocation_config(&file)?;

    let (_, issues) = verify(&config, &VerifyOptions::default());
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

    let report = build_report(&config, &token, max_decimals)?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Token: {} ({}), {} decimals, supply policy {}",
        report.token.name, report.token.symbol, report.token.decimals, report.token.supply_policy
    );
    println!();
    print_table_header();
    for line in report
        .buckets
        .iter()
        .chain(report.operators.iter())
        .chain(std::iter::once(&report.deployer))
    {
        println!("{}", format_table_row(line));
    }
    println!();
    println!("Total premine: {} wei", report.total_premine_wei);
    println!("Total premine: {} QIK", report.total_premine_qik);
    println!("Note: {}", report.supply_policy_note);
    Ok(())
}
