//! Integration tests for veripack-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;
use veripack_core::ChecksumAlgorithm;
use veripack_core::test_utils::digest_hex;
use veripack_core::test_utils::manifest_xml;
use veripack_core::test_utils::write_dir_package;

fn veripack_cmd() -> Command {
    cargo_bin_cmd!("veripack")
}

fn good_package() -> TempDir {
    let temp = TempDir::new().expect("failed to create temp dir");
    let doc = manifest_xml(&[(
        "data/a.txt",
        "SHA-256",
        &digest_hex(b"alpha", ChecksumAlgorithm::Sha256),
    )]);
    write_dir_package(
        temp.path(),
        &[("mets.xml", doc.as_bytes()), ("data/a.txt", b"alpha")],
    );
    temp
}

fn tampered_package() -> TempDir {
    let temp = TempDir::new().expect("failed to create temp dir");
    let doc = manifest_xml(&[(
        "data/a.txt",
        "SHA-256",
        &digest_hex(b"alpha", ChecksumAlgorithm::Sha256),
    )]);
    write_dir_package(
        temp.path(),
        &[("mets.xml", doc.as_bytes()), ("data/a.txt", b"tampered")],
    );
    temp
}

#[test]
fn test_version_flag() {
    veripack_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("veripack"));
}

#[test]
fn test_help_flag() {
    veripack_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Verify packages"));
}

#[test]
fn test_verify_clean_package_exits_zero() {
    let temp = good_package();
    veripack_cmd()
        .arg("verify")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1/1 package(s) passed"));
}

#[test]
fn test_verify_tampered_package_exits_nonzero() {
    let temp = tampered_package();
    veripack_cmd()
        .arg("verify")
        .arg(temp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("checksum mismatch"));
}

#[test]
fn test_verify_skipping_fixity_ignores_tampering() {
    let temp = tampered_package();
    veripack_cmd()
        .arg("verify")
        .arg(temp.path())
        .arg("--skip-fixity")
        .assert()
        .success();
}

#[test]
fn test_verify_json_output_is_parseable() {
    let temp = good_package();
    let output = veripack_cmd()
        .arg("--json")
        .arg("verify")
        .arg(temp.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["operation"], "verify");
    assert_eq!(value["status"], "success");
    let report = &value["data"][0];
    assert_eq!(report["passed"], true);
    assert_eq!(report["checks"].as_array().unwrap().len(), 4);
}

#[test]
fn test_verify_missing_manifest_reports_error_with_hint() {
    let temp = TempDir::new().unwrap();
    write_dir_package(temp.path(), &[("data/a.txt", b"alpha")]);

    veripack_cmd()
        .arg("verify")
        .arg(temp.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("No manifest matching"))
        .stdout(predicate::str::contains("HINT"));
}

#[test]
fn test_verify_json_failure_stays_in_envelope() {
    let temp = tampered_package();
    let output = veripack_cmd()
        .arg("--json")
        .arg("verify")
        .arg(temp.path())
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    // The whole stdout must still be one parseable document.
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"][0]["passed"], false);
}

#[test]
fn test_list_json_error_envelope() {
    let temp = TempDir::new().unwrap();
    write_dir_package(temp.path(), &[("data/a.txt", b"alpha")]);

    let output = veripack_cmd()
        .arg("--json")
        .arg("list")
        .arg(temp.path())
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["status"], "error");
    assert!(
        value["error"]
            .as_str()
            .unwrap()
            .contains("No manifest matching")
    );
}

#[test]
fn test_verify_batch_mixes_results() {
    let good = good_package();
    let bad = tampered_package();

    veripack_cmd()
        .arg("verify")
        .arg(good.path())
        .arg(bad.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("1/2 package(s) passed"));
}

#[test]
fn test_verify_prints_summary_table() {
    let good = good_package();
    let bad = tampered_package();

    veripack_cmd()
        .arg("verify")
        .arg(good.path())
        .arg(bad.path())
        .assert()
        .failure()
        .stdout(
            predicate::str::is_match(
                r"(?m)^package\s+validity\s+completeness\s+fixity\s+orphans\s+result$",
            )
            .unwrap(),
        )
        .stdout(predicate::str::is_match(r"(?m)pass\s+pass\s+fail\s+pass\s+FAIL$").unwrap());
}

#[test]
fn test_verify_manifest_pattern() {
    let temp = TempDir::new().unwrap();
    let doc = manifest_xml(&[]);
    write_dir_package(temp.path(), &[("manifest-7.xml", doc.as_bytes())]);

    veripack_cmd()
        .arg("verify")
        .arg(temp.path())
        .arg("--manifest-pattern")
        .arg(r"^manifest-\d+\.xml$")
        .assert()
        .success();
}

#[test]
fn test_list_shows_entries() {
    let temp = good_package();
    veripack_cmd()
        .arg("list")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("data/a.txt"))
        .stdout(predicate::str::contains("SHA-256"));
}

#[test]
fn test_list_json_output() {
    let temp = good_package();
    let output = veripack_cmd()
        .arg("--json")
        .arg("list")
        .arg(temp.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["operation"], "list");
    assert_eq!(value["data"][0]["path"], "data/a.txt");
}
