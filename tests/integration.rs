//! Integration tests for the kevo CLI

use assert_cmd::Command;
use predicates::prelude::*;

fn search_shared_17(cmd: &mut Command) -> &mut Command {
    cmd.arg("search")
        .arg("tests/fixtures/shared_nonce_17.json")
        .args(["--modulus", "17"])
        .args(["--population", "60"])
        .args(["--generations", "500"])
        .args(["--threshold", "0"])
        .args(["--mutation-prob", "0.9"])
        .args(["--sigma-divisor", "4"])
        .args(["--seed", "42"])
        .arg("--quiet")
}

#[test]
fn test_search_converges_and_recovers_key() {
    let mut cmd = Command::cargo_bin("kevo").unwrap();
    search_shared_17(&mut cmd)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Status: converged"))
        .stdout(predicate::str::contains("Private Key (decimal): 5"));
}

#[test]
fn test_search_from_stdin() {
    let input = include_str!("fixtures/shared_nonce_17.json");
    Command::cargo_bin("kevo")
        .unwrap()
        .arg("search")
        .arg("-")
        .args(["--modulus", "17"])
        .args(["--population", "60"])
        .args(["--generations", "500"])
        .args(["--threshold", "0"])
        .args(["--mutation-prob", "0.9"])
        .args(["--sigma-divisor", "4"])
        .args(["--seed", "42"])
        .arg("--quiet")
        .write_stdin(input)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("converged"));
}

#[test]
fn test_json_output_schema() {
    let mut cmd = Command::cargo_bin("kevo").unwrap();
    let output = search_shared_17(&mut cmd).arg("--json").output().unwrap();

    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");

    assert_eq!(json["status"].as_str(), Some("converged"));
    assert_eq!(json["best_score"].as_str(), Some("0"));
    assert_eq!(json["best_nonce"].as_str(), Some("3"));
    assert_eq!(json["recovery_status"].as_str(), Some("recovered"));
    assert_eq!(
        json["recovered_key"]["private_key_decimal"].as_str(),
        Some("5")
    );
    assert_eq!(json["recovered_key"]["private_key_hex"].as_str(), Some("05"));
    assert_eq!(json["summary"]["total_signatures"].as_u64(), Some(2));
    assert_eq!(json["summary"]["modulus"].as_str(), Some("17"));
    assert!(json["generations"].is_u64());
}

#[test]
fn test_search_exhausts_without_shared_nonce() {
    Command::cargo_bin("kevo")
        .unwrap()
        .arg("search")
        .arg("tests/fixtures/distinct_nonce_17.json")
        .args(["--modulus", "17"])
        .args(["--generations", "40"])
        .args(["--threshold", "0"])
        .args(["--seed", "7"])
        .arg("--quiet")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Status: exhausted"))
        .stdout(predicate::str::contains("No key recovered"));
}

#[test]
fn test_default_modulus_run_reports_exhaustion() {
    // Full-size search space: a few generations cannot converge, but the
    // run must complete cleanly under the default secp256k1 order.
    Command::cargo_bin("kevo")
        .unwrap()
        .arg("search")
        .arg("tests/fixtures/shared_nonce_secp256k1.json")
        .args(["--population", "20"])
        .args(["--generations", "3"])
        .args(["--threshold", "0"])
        .args(["--seed", "1"])
        .arg("--quiet")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("exhausted"));
}

#[test]
fn test_progress_reported_on_stderr() {
    Command::cargo_bin("kevo")
        .unwrap()
        .arg("search")
        .arg("tests/fixtures/distinct_nonce_17.json")
        .args(["--modulus", "17"])
        .args(["--generations", "5"])
        .args(["--threshold", "0"])
        .args(["--seed", "7"])
        .assert()
        .code(0)
        .stderr(predicate::str::contains("generation 0: best k = "));
}

#[test]
fn test_invalid_input_error_exit() {
    Command::cargo_bin("kevo")
        .unwrap()
        .arg("search")
        .arg("-")
        .write_stdin("not valid json")
        .assert()
        .code(2);
}

#[test]
fn test_invalid_config_error_exit() {
    Command::cargo_bin("kevo")
        .unwrap()
        .arg("search")
        .arg("tests/fixtures/shared_nonce_17.json")
        .args(["--modulus", "17"])
        .args(["--population", "0"])
        .assert()
        .code(2);
}

#[test]
fn test_degenerate_signature_rejected_at_load() {
    Command::cargo_bin("kevo")
        .unwrap()
        .arg("search")
        .arg("-")
        .args(["--modulus", "17"])
        .write_stdin(r#"[{"r": "0", "s": "5", "z": "3"}]"#)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be zero"));
}
