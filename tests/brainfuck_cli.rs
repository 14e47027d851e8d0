use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bfbool").unwrap();
    cmd.env_remove("BFBOOL_TIMEOUT_MS").env_remove("BFBOOL_MAX_STEPS");
    cmd
}

fn code_to_tempfile(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

const HELLO: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

/// `A` (65) in cell 1, the pointer left on it.
const SIXTY_FIVE: &str = "++++++++[>++++++++<-]>+";

#[test]
fn positional_code_prints_hello_world() {
    cargo_bin()
        .arg("brainfuck")
        .arg(HELLO)
        .assert()
        .success()
        .stdout("Hello World!\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn alias_and_split_code_parts() {
    cargo_bin()
        .args(["bf", SIXTY_FIVE, "."])
        .assert()
        .success()
        .stdout("A");
}

#[test]
fn file_with_comments_runs() {
    let tf = code_to_tempfile(&format!("set cell one to sixty five\n{SIXTY_FIVE}\nthen print it .\n"));
    cargo_bin()
        .arg("brainfuck")
        .arg("--file")
        .arg(tf.path())
        .assert()
        .success()
        .stdout("A");
}

#[test]
fn missing_program_is_a_usage_error() {
    cargo_bin()
        .arg("brainfuck")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no program given"));
}

#[test]
fn file_and_positional_code_conflict() {
    let tf = code_to_tempfile("+.");
    cargo_bin()
        .arg("brainfuck")
        .arg("--file")
        .arg(tf.path())
        .arg("+.")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot use positional code together with --file"));
}

#[test]
fn unmatched_bracket_is_reported_before_running() {
    cargo_bin()
        .args(["brainfuck", "+.[[]"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("Parse error: unmatched bracket")
                .and(predicate::str::contains("at instruction 2"))
                .and(predicate::str::contains("^")),
        );
}

#[test]
fn stray_close_bracket_is_reported() {
    cargo_bin()
        .args(["brainfuck", "+]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unmatched bracket").and(predicate::str::contains("at instruction 1")));
}

#[test]
fn pointer_left_of_origin_fails() {
    cargo_bin()
        .args(["brainfuck", "<+"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pointer out of range (ptr=-1)"));
}

#[test]
fn strict_cells_report_underflow() {
    cargo_bin()
        .args(["brainfuck", "--no-cell-wrap", "+--"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("underflowed minimum value 0"));
}

#[test]
fn tape_limit_is_enforced() {
    cargo_bin()
        .args(["brainfuck", "--max-tape", "3", ">>>"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("maximum tape length of 3 exceeded"));
}

#[test]
fn tape_wrap_moves_pointer_around() {
    // Four moves right on a four-cell tape come back to the same cell
    cargo_bin()
        .args(["brainfuck", "--max-tape", "4", "--tape-wrap", SIXTY_FIVE, ">>>>."])
        .assert()
        .success()
        .stdout("A");
}

#[test]
fn oversized_wrapping_tape_is_a_configuration_error() {
    cargo_bin()
        .args(["brainfuck", "--max-tape", &usize::MAX.to_string(), "--tape-wrap", "+"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error: cannot allocate a tape"));
}

#[test]
fn wider_cells_keep_large_values() {
    let code = format!("{}.", "+".repeat(300));
    cargo_bin()
        .args(["brainfuck", "--bits", "16", &code])
        .assert()
        .success()
        .stdout("\u{12C}");
    cargo_bin()
        .args(["brainfuck", &code])
        .assert()
        .success()
        .stdout(",");
}

#[test]
fn invalid_cell_width_is_a_configuration_error() {
    cargo_bin()
        .args(["brainfuck", "--bits", "64", "+"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn input_reads_first_character_of_each_line() {
    cargo_bin()
        .args(["brainfuck", ",.,.,."])
        .write_stdin("Hi\nyo\n\n")
        .assert()
        .success()
        .stdout("Hy\n");
}

#[test]
fn eof_leaves_cell_unchanged_by_default() {
    cargo_bin()
        .args(["brainfuck", &format!("{SIXTY_FIVE},.")])
        .assert()
        .success()
        .stdout("A");
}

#[test]
fn eof_zero_clears_cell() {
    cargo_bin()
        .args(["brainfuck", "--eof", "zero", &format!("{SIXTY_FIVE},.")])
        .assert()
        .success()
        .stdout("\0");
}

#[test]
fn utf8_bytes_are_reconstructed() {
    // 0xC3 then 0xA9 encode 'é'
    let code = format!("{}.>{}.", "+".repeat(0xC3), "+".repeat(0xA9));
    cargo_bin()
        .args(["brainfuck", &code])
        .assert()
        .success()
        .stdout("é");
    cargo_bin()
        .args(["brainfuck", "--no-extended", &code])
        .assert()
        .success()
        .stdout("\u{C3}\u{A9}");
}

#[test]
fn step_limit_aborts_infinite_loop() {
    cargo_bin()
        .args(["brainfuck", "--max-steps", "50", "+[]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded (50)"));
}

#[test]
fn step_limit_falls_back_to_env() {
    cargo_bin()
        .env("BFBOOL_MAX_STEPS", "10")
        .args(["brainfuck", "+[]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step limit exceeded (10)"));
}

#[test]
fn timeout_aborts_infinite_loop() {
    cargo_bin()
        .args(["brainfuck", "--timeout", "200", "+[]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wall-clock timeout exceeded (200 ms)"));
}

#[test]
fn user_config_file_sets_defaults() {
    let home = tempfile::tempdir().expect("tempdir");
    let config_dir = home.path().join(".config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("bfbool.toml"), "[brainfuck]\nbits = 16\n").unwrap();

    let code = format!("{}.", "+".repeat(300));
    cargo_bin()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", &config_dir)
        .args(["brainfuck", &code])
        .assert()
        .success()
        .stdout("\u{12C}");

    // Flags win over the file
    cargo_bin()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", &config_dir)
        .args(["brainfuck", "--bits", "8", &code])
        .assert()
        .success()
        .stdout(",");
}
