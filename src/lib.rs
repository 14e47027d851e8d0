//! A Brainfuck and Boolfuck interpreter library.
//!
//! Both languages run on one engine, [`Interpreter`], parameterized by a
//! [`Dialect`]:
//!
//! - [`BrainfuckInterpreter`]: configurable cell width, signedness and
//!   overflow policy ([`BrainfuckConfig`]); a tape that grows to the right up
//!   to a maximum size (or wraps around, if asked); `,` reads one line of
//!   input and stores its first character; `.` reconstructs multi-byte
//!   characters written one byte at a time.
//! - [`BoolfuckInterpreter`]: 1-bit cells on a tape that grows in both
//!   directions; input and output are bit streams packed least-significant
//!   bit first.
//!
//! Any character outside a dialect's instruction set is a comment.
//! Unbalanced brackets are rejected before anything runs, and loop jumps
//! are resolved through a precomputed table.
//!
//! Quick start:
//!
//! ```no_run
//! use bfbool::{BrainfuckConfig, BrainfuckInterpreter};
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
//! let mut bf = BrainfuckInterpreter::new(code, BrainfuckConfig::default()).expect("valid program");
//! bf.run().expect("program should run");
//! ```

pub mod brackets;
pub mod cli_util;
pub mod codec;
pub mod commands;
pub mod config;
pub mod dialect;
pub mod error;
pub mod interpreter;
pub mod logging;
pub mod tape;
mod theme;

pub use brackets::BracketTable;
pub use config::{BrainfuckConfig, EofBehavior};
pub use dialect::{Boolfuck, Brainfuck, Dialect, Op};
pub use error::{InterpreterError, UnmatchedBracketKind};
pub use interpreter::{BoolfuckInterpreter, BrainfuckInterpreter, Interpreter, StepControl};
pub use tape::{CellPolicy, Tape, TapeLayout};
