use assert_cmd::Command;
use predicates::prelude::*;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bfbool").unwrap();
    cmd.env_remove("BFBOOL_TIMEOUT_MS").env_remove("BFBOOL_MAX_STEPS");
    cmd
}

/// Echo one character: eight reads, each written straight back.
const ECHO: &str = ",;,;,;,;,;,;,;,;";

#[test]
fn writes_bits_least_significant_first() {
    // 1,0,0,0,0,0,1,0 -> 65
    cargo_bin()
        .args(["boolfuck", "+;+;;;;;+;+;"])
        .assert()
        .success()
        .stdout("A")
        .stderr(predicate::str::is_empty());
}

#[test]
fn echo_from_input_flag() {
    cargo_bin()
        .args(["bool", "--input", "Zz", ECHO, ECHO])
        .assert()
        .success()
        .stdout("Zz");
}

#[test]
fn echo_from_piped_stdin() {
    cargo_bin()
        .args(["boolfuck", ECHO])
        .write_stdin("Q")
        .assert()
        .success()
        .stdout("Q");
}

#[test]
fn exhausted_input_reads_zero_bits() {
    cargo_bin()
        .args(["boolfuck", "--input", "", ECHO])
        .assert()
        .success()
        .stdout("\0");
}

#[test]
fn brainfuck_only_symbols_are_comments() {
    // `-` and `.` mean nothing here
    cargo_bin()
        .args(["boolfuck", "+;-.+;;;;;+;+;"])
        .assert()
        .success()
        .stdout("A");
}

#[test]
fn unmatched_bracket_is_reported() {
    cargo_bin()
        .args(["boolfuck", "+[;"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unmatched bracket").and(predicate::str::contains("at instruction 1")));
}

#[test]
fn step_limit_discards_pending_output() {
    cargo_bin()
        .args(["boolfuck", "--max-steps", "100", "+;[]"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("step limit exceeded (100)"));
}
