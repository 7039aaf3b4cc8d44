use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::time::Duration;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bfi").unwrap();
    cmd.env("BFI_CONFIG", "/nonexistent/bfi.toml")
        .env_remove("BFI_CELL_SIZE")
        .env_remove("BFI_MEMORY_DUMP")
        .timeout(Duration::from_secs(5));
    cmd
}

#[test]
fn unexpected_closing_bracket_is_reported_without_running() {
    cargo_bin()
        .args(["-e", "+.]"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("[Syntax error] Unexpected closing bracket in line 1 at position 3")
                .and(predicate::str::contains("^")),
        );
}

#[test]
fn unclosed_bracket_reports_outermost() {
    let mut tf = tempfile::NamedTempFile::new().unwrap();
    write!(tf, "+\n\n[[-]\n").unwrap();
    cargo_bin()
        .arg(tf.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("[Syntax error] Unclosed bracket in line 3 at position 1"));
}

#[test]
fn zero_cell_size_fails() {
    cargo_bin()
        .args(["--cell-size", "0", "-e", "+"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Cell size cannot be less than 1"));
}

#[test]
fn negative_cell_size_fails() {
    cargo_bin()
        .args(["--cell-size", "-4", "-e", "+"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cell size cannot be less than 1"));
}

#[test]
fn invalid_cell_size_from_environment_fails() {
    cargo_bin()
        .env("BFI_CELL_SIZE", "0")
        .args(["-e", "+"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cell size cannot be less than 1"));
}

#[test]
fn missing_script_file_fails() {
    cargo_bin()
        .arg("/nonexistent/program.bf")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("program.bf"));
}

#[test]
fn malformed_config_file_is_a_warning() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    write!(config, "[interpreter\n").unwrap();
    cargo_bin()
        .arg("--config")
        .arg(config.path())
        .args(["-e", "++."])
        .assert()
        .success()
        .stdout("\u{2}\n")
        .stderr(predicate::str::contains("warning"));
}
