//! Output formatting utilities.

use qikchain_genesis::{ReportLine, ValidateResult, ValidationIssue};
use serde_json::{json, Value};

/// Formats a document as indented JSON.
pub fn format_json(doc: &Value) -> String {
    serde_json::to_string_pretty(doc).unwrap_or_else(|_| "{}".to_string())
}

/// JSON view of a validation outcome.
pub fn validation_json(res: &ValidateResult) -> Value {
    json!({
        "ok": res.is_ok(),
        "errors": res.errors.iter().map(issue_json).collect::<Vec<_>>(),
        "warnings": res.warnings,
    })
}

fn issue_json(issue: &ValidationIssue) -> Value {
    json!({ "path": issue.path, "message": issue.message })
}

/// Prints every error and warning, one per line, to stderr.
pub fn print_findings(res: &ValidateResult) {
    for warning in &res.warnings {
        eprintln!("warning: {}", warning);
    }
    for issue in &res.errors {
        eprintln!("- {}", issue);
    }
}

/// Formats a report line as a table row.
pub fn format_table_row(line: &ReportLine) -> String {
    format!(
        "{:<12} {:<42} {:>28} {}",
        truncate(&line.name, 12),
        line.address,
        line.wei,
        line.qik
    )
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!(
        "{:<12} {:<42} {:>28} {}",
        "NAME", "ADDRESS", "WEI", "QIK"
    );
    println!("{}", "-".repeat(100));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
