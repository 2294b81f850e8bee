//! Integration tests for CLI commands.

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn config_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config")
}

fn config_path(rel: &str) -> String {
    config_dir().join(rel).to_string_lossy().to_string()
}

fn run_cli(cwd: &Path, args: &[&str]) -> (Option<i32>, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_qikchain"))
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.code(), stdout, stderr)
}

fn build_args(out: &str) -> Vec<String> {
    vec![
        "genesis".into(),
        "build".into(),
        "--template".into(),
        config_path("genesis.template.json"),
        "--overlay-dir".into(),
        config_path("consensus"),
        "--token".into(),
        config_path("token.json"),
        "--allocations".into(),
        config_path("allocations/devnet.json"),
        "--chain-id".into(),
        "100".into(),
        "--pretty".into(),
        "--out-combined".into(),
        out.to_string(),
    ]
}

fn as_strs(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

#[test]
fn test_genesis_build_writes_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let args = build_args("out/genesis.json");
    let (code, stdout, _) = run_cli(temp_dir.path(), &as_strs(&args));
    assert_eq!(code, Some(0));
    assert!(stdout.contains("Total premine"));
    assert!(stdout.contains("sha-256:"));

    let out = temp_dir.path().join("out");
    for name in ["genesis.json", "chain.json", "genesis-eth.json", "chain-metadata.json"] {
        assert!(out.join(name).is_file(), "missing {}", name);
    }
    let chain: Value = serde_json::from_slice(&fs::read(out.join("chain.json")).unwrap()).unwrap();
    let genesis_path = PathBuf::from(chain["genesis"].as_str().unwrap());
    assert!(genesis_path.is_absolute());
    assert!(genesis_path.ends_with("out/genesis-eth.json"));
}

#[test]
fn test_genesis_build_json_summary() {
    let temp_dir = TempDir::new().unwrap();
    let mut args = build_args("build/genesis.json");
    args.push("--json".into());
    let (code, stdout, _) = run_cli(temp_dir.path(), &as_strs(&args));
    assert_eq!(code, Some(0));

    let summary: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["consensus"], "poa");
    assert_eq!(summary["chainId"], 100);
    assert_eq!(summary["totalPremineQIK"], "900003000");
    assert!(summary["digests"]["genesis"]
        .as_str()
        .unwrap()
        .starts_with("sha-256:"));
}

#[test]
fn test_genesis_build_is_reproducible() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let args = build_args("build/genesis.json");
    assert_eq!(run_cli(first.path(), &as_strs(&args)).0, Some(0));
    assert_eq!(run_cli(second.path(), &as_strs(&args)).0, Some(0));

    let read = |dir: &TempDir, name: &str| fs::read(dir.path().join("build").join(name)).unwrap();
    assert_eq!(read(&first, "genesis-eth.json"), read(&second, "genesis-eth.json"));
    assert_eq!(read(&first, "chain-metadata.json"), read(&second, "chain-metadata.json"));
}

#[test]
fn test_genesis_build_missing_chain_id_is_usage_error() {
    let temp_dir = TempDir::new().unwrap();
    let args: Vec<String> = build_args("build/genesis.json")
        .into_iter()
        .filter(|a| a != "--chain-id" && a != "100")
        .collect();
    let (code, _, stderr) = run_cli(temp_dir.path(), &as_strs(&args));
    assert_eq!(code, Some(2));
    assert!(stderr.contains("chain id"));
    assert!(!temp_dir.path().join("build").exists());
}

#[test]
fn test_genesis_build_rejects_unknown_consensus() {
    let temp_dir = TempDir::new().unwrap();
    let mut args = build_args("build/genesis.json");
    args.extend(["--consensus".to_string(), "pow".to_string()]);
    let (code, _, _) = run_cli(temp_dir.path(), &as_strs(&args));
    assert_eq!(code, Some(2));
}

#[test]
fn test_genesis_build_pos_requires_deployments() {
    let temp_dir = TempDir::new().unwrap();
    let mut args = build_args("build/genesis.json");
    args.extend(["--consensus".to_string(), "pos".to_string()]);
    let (code, _, stderr) = run_cli(temp_dir.path(), &as_strs(&args));
    assert_eq!(code, Some(1));
    assert!(stderr.contains("pos deployments"));

    args.push("--allow-missing-pos-addresses".into());
    let (code, _, _) = run_cli(temp_dir.path(), &as_strs(&args));
    assert_eq!(code, Some(0));
    assert!(temp_dir.path().join("build/pos-addresses.json").is_file());
}

#[test]
fn test_genesis_validate_command() {
    let temp_dir = TempDir::new().unwrap();
    let args = build_args("build/genesis.json");
    assert_eq!(run_cli(temp_dir.path(), &as_strs(&args)).0, Some(0));

    let (code, stdout, _) = run_cli(temp_dir.path(), &["genesis", "validate", "build/chain.json"]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("OK"));

    let (code, _, _) = run_cli(temp_dir.path(), &["genesis", "validate", "build/genesis-eth.json"]);
    assert_eq!(code, Some(0));
}

#[test]
fn test_genesis_validate_reports_all_errors_as_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.json");
    fs::write(
        &path,
        serde_json::to_vec(&json!({"consensus": {"type": "ibft"}, "params": {}, "genesis": 5})).unwrap(),
    )
    .unwrap();

    let (code, stdout, _) = run_cli(
        temp_dir.path(),
        &["genesis", "validate", "bad.json", "--json", "--strict"],
    );
    assert_eq!(code, Some(1));
    let res: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(res["ok"], false);
    let paths: Vec<&str> = res["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert_eq!(
        paths,
        vec!["", "params.chainID", "params.forks", "params.engine", "genesis"]
    );
}

#[test]
fn test_allocations_verify_command() {
    let temp_dir = TempDir::new().unwrap();
    let file = config_path("allocations/devnet.json");
    let (code, stdout, _) = run_cli(temp_dir.path(), &["allocations", "verify", "--file", &file]);
    assert_eq!(code, Some(0));
    assert!(stdout.contains("5 unique address(es)"));

    let bad = temp_dir.path().join("bad.json");
    let mut doc: Value = serde_json::from_slice(&fs::read(&file).unwrap()).unwrap();
    doc["deployer"]["address"] = json!("0x0000000000000000000000000000000000000000");
    fs::write(&bad, serde_json::to_vec(&doc).unwrap()).unwrap();

    let (code, _, stderr) = run_cli(temp_dir.path(), &["allocations", "verify", "--file", "bad.json"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("deployer.address: zero address is not allowed"));

    let (code, _, _) = run_cli(
        temp_dir.path(),
        &["allocations", "verify", "--file", "bad.json", "--allow-zero-address"],
    );
    assert_eq!(code, Some(0));
}

#[test]
fn test_allocations_report_json() {
    let temp_dir = TempDir::new().unwrap();
    let file = config_path("allocations/devnet.json");
    let token = config_path("token.json");
    let (code, stdout, _) = run_cli(
        temp_dir.path(),
        &["allocations", "report", "--file", &file, "--token", &token, "--json"],
    );
    assert_eq!(code, Some(0));
    let report: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["totalPremineWei"], "900003000000000000000000000");
    assert_eq!(report["totalPremineQIK"], "900003000");
    assert_eq!(report["buckets"][0]["name"], "ecosystem");
}

#[test]
fn test_allocations_report_table() {
    let temp_dir = TempDir::new().unwrap();
    let file = config_path("allocations/devnet.json");
    let token = config_path("token.json");
    let (code, stdout, _) = run_cli(
        temp_dir.path(),
        &["allocations", "report", "--file", &file, "--token", &token],
    );
    assert_eq!(code, Some(0));
    assert!(stdout.contains("ADDRESS"));
    assert!(stdout.contains("treasury"));
    assert!(stdout.contains("Total premine: 900003000 QIK"));
}

#[test]
fn test_canonicalize_command() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("input.json");
    fs::write(&path, r#"{"b": [1, {"d": true, "c": null}], "a": "x"}"#).unwrap();

    let (code, stdout, _) = run_cli(temp_dir.path(), &["canonicalize", "input.json"]);
    assert_eq!(code, Some(0));
    assert_eq!(stdout, "{\"a\":\"x\",\"b\":[1,{\"c\":null,\"d\":true}]}\n");

    let (code, stdout, _) = run_cli(temp_dir.path(), &["canonicalize", "input.json", "--pretty"]);
    assert_eq!(code, Some(0));
    assert!(stdout.starts_with("{\n  \"a\": \"x\",\n"));
    assert!(stdout.ends_with("}\n"));
}

#[test]
fn test_canonicalize_invalid_json() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("bad.json"), "{not json").unwrap();
    let (code, _, stderr) = run_cli(temp_dir.path(), &["canonicalize", "bad.json"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("invalid JSON"));
}
