//! Integration tests for the regscan CLI.
//!
//! Only network-free commands are exercised here: extract and config.

use assert_cmd::Command;
use predicates::prelude::*;

fn regscan() -> Command {
    Command::cargo_bin("regscan").unwrap()
}

#[test]
fn test_extract_plate_from_tokens() {
    regscan()
        .args(["extract", "DK", "HG30202"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"plate\": \"HG30202\""));
}

#[test]
fn test_extract_odometer_when_no_plate() {
    regscan()
        .args(["extract", "151517"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"odometer\": 151517"));
}

#[test]
fn test_extract_vin_from_text_blob() {
    regscan()
        .args(["extract", "--text", "WVWZZZ1JZXW000001 KM 135116"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WVWZZZ1JZXW000001"))
        .stdout(predicate::str::contains("odometer").not());
}

#[test]
fn test_extract_trip_reading() {
    regscan()
        .args(["extract", "2", "19.3", "km"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"odometer\": \"19.3\""));
}

#[test]
fn test_extract_reads_stdin() {
    regscan()
        .arg("extract")
        .write_stdin("DK HG30202\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("HG30202"));
}

#[test]
fn test_extract_text_output_format() {
    regscan()
        .args(["extract", "--format", "text", "DK", "HG30202"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plate:    HG30202"));
}

#[test]
fn test_extract_worker_profile() {
    regscan()
        .args(["extract", "--profile", "worker", "DK", "HG30202"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HG30202"));
}

#[test]
fn test_extract_nothing_found() {
    regscan()
        .args(["extract", "hello", "world"])
        .assert()
        .success()
        .stdout(predicate::str::contains("raw_text"))
        .stdout(predicate::str::contains("\"plate\"").not());
}

#[test]
fn test_config_path_prints_location() {
    regscan()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"));
}

#[test]
fn test_config_init_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    regscan()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("worker_url"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{}").unwrap();

    regscan()
        .args(["config", "init", "--output"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_scan_missing_file_fails() {
    regscan()
        .args(["scan", "/nonexistent/image.jpg"])
        .assert()
        .failure();
}
