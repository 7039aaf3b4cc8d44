use assert_cmd::Command;
use predicates::prelude::*;

fn cargo_bin() -> Command {
    Command::cargo_bin("bfi").unwrap()
}

#[test]
fn no_arguments_prints_usage_and_exits_zero() {
    cargo_bin()
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Usage:").and(predicate::str::contains("--cell-size")));
}

#[test]
fn help_flag_prints_usage_and_exits_zero() {
    for flag in ["--help", "-h"] {
        cargo_bin()
            .arg(flag)
            .assert()
            .code(0)
            .stderr(predicate::str::contains("--memory-dump"));
    }
}

#[test]
fn help_wins_over_script() {
    cargo_bin()
        .args(["--help", "-e", "+."])
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn unknown_option_is_rejected() {
    cargo_bin()
        .arg("--bogus")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn usage_explains_which_stream_gets_what() {
    cargo_bin()
        .assert()
        .code(0)
        .stderr(predicate::str::contains("error messages (including syntax errors) go to stderr"));
}
