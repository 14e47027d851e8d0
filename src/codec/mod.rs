//! Output and input channels of the interpreter.
//!
//! [`text`] serves Brainfuck: one character per `.`, with optional
//! reconstruction of multi-byte characters, and one input line per `,`.
//! [`bits`] serves Boolfuck: bits are packed least-significant first.

use std::io::{self, Write};

use crate::error::IoFault;

pub mod bits;
pub mod text;

/// Receives decoded output characters in program order.
pub type OutputSink = Box<dyn FnMut(char) + Send>;

/// The I/O behavior behind the output and input instructions.
pub trait CellIo {
    /// Handle an output instruction for the current cell value.
    fn output(&mut self, value: i64) -> Result<(), IoFault>;

    /// Handle an input instruction. `None` leaves the cell untouched.
    fn input(&mut self) -> Result<Option<i64>, IoFault>;

    /// Called once after the program halts normally.
    fn finish(&mut self) -> Result<(), IoFault>;

    /// Replace the output sink.
    fn set_sink(&mut self, sink: OutputSink);

    /// Everything decoded so far.
    fn transcript(&self) -> String;
}

/// Print each character to stdout as soon as it is produced.
pub fn stdout_sink() -> OutputSink {
    Box::new(|ch| {
        let mut out = io::stdout().lock();
        let _ = write!(out, "{ch}");
        let _ = out.flush();
    })
}
