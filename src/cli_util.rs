use std::io::{self, IsTerminal, Write};

use nu_ansi_term::Style;

use crate::theme::catppuccin::Mocha as P;
use crate::InterpreterError;

/// Characters of program shown on each side of an error position.
const WINDOW_CHARS: usize = 32;

/// Pretty-print an [`InterpreterError`] with caret positioning.
/// If `program` is `Some("bfbool")`, messages are prefixed with "bfbool: ...".
/// `code` must be the sanitized program the error positions refer to.
pub fn print_interpreter_error(program: Option<&str>, code: &str, err: &InterpreterError) {
    let prefix_program = |msg: String| match program {
        Some(p) => format!("{p}: {msg}"),
        None => msg,
    };

    let (msg, pos) = match err {
        InterpreterError::UnmatchedBrackets { ip, kind } => {
            (format!("Parse error: unmatched bracket {kind}"), Some(*ip))
        }
        InterpreterError::PointerOutOfRange { ip, ptr } => {
            (format!("Runtime error: pointer out of range (ptr={ptr})"), Some(*ip))
        }
        InterpreterError::CellOverflow { ip, ptr, max } => {
            (format!("Runtime error: cell[{ptr}] overflowed maximum value {max}"), Some(*ip))
        }
        InterpreterError::CellUnderflow { ip, ptr, min } => {
            (format!("Runtime error: cell[{ptr}] underflowed minimum value {min}"), Some(*ip))
        }
        InterpreterError::TapeExhausted { ip, limit } => {
            (format!("Runtime error: maximum tape length of {limit} exceeded"), Some(*ip))
        }
        InterpreterError::InputInterrupted { ip } => ("Input interrupted".to_string(), Some(*ip)),
        InterpreterError::Io { ip, source } => (format!("I/O error: {source}"), Some(*ip)),
        InterpreterError::InvalidConfig(reason) => (format!("Configuration error: {reason}"), None),
        InterpreterError::StepLimitExceeded { .. } | InterpreterError::Canceled => (err.to_string(), None),
    };

    let msg = prefix_program(msg);
    match pos {
        Some(pos) => print_error_with_context(&msg, code, pos),
        None => {
            eprintln!("{}", paint(Style::new().fg(P::RED).bold(), &msg));
            let _ = io::stderr().flush();
        }
    }
}

/// Print a concise error with instruction index and a caret context window.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    let header = format!("{prefix} at instruction {pos}");
    eprintln!("{}", paint(Style::new().fg(P::RED).bold(), &header));

    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = pos + WINDOW_CHARS + 1;
    let slice = &code[byte_index(code, start_char)..byte_index(code, end_char)];
    eprintln!("  {}", paint(Style::new().fg(P::SURFACE2), slice));

    let underline = format!("{}^", " ".repeat(pos - start_char));
    eprintln!("  {}", paint(Style::new().fg(P::PEACH).bold(), &underline));
    let _ = io::stderr().flush();
}

/// Print a one-line abort notice (timeouts, step limits).
pub fn print_abort(msg: &str) {
    eprintln!("{}", paint(Style::new().fg(P::YELLOW), msg));
    let _ = io::stderr().flush();
}

/// Style only when stderr is a terminal; keep pipelines clean otherwise.
fn paint(style: Style, text: &str) -> String {
    if io::stderr().is_terminal() {
        style.paint(text).to_string()
    } else {
        text.to_string()
    }
}

/// Byte offset of the `char_idx`-th character, clamped to the end of `s`.
fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}
