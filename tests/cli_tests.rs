use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn prints_help() {
    let mut cmd = Command::cargo_bin("asconnect").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("App Store Connect CLI in Rust"));
}

#[test]
fn upload_requires_operations_argument() {
    let mut cmd = Command::cargo_bin("asconnect").unwrap();
    cmd.args(["upload", "--file", "/tmp/whatever.bin"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--operations"));
}
