//! Instruction sets of the two supported languages.
//!
//! Both languages compile to the same closed [`Op`] enumeration; a
//! [`Dialect`] only decides which source symbols exist and what they mean.

use crate::codec::{bits::BitIo, text::TextIo, CellIo};

/// One executable instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `>`
    Right,
    /// `<`
    Left,
    /// `+` in Brainfuck.
    Increment,
    /// `-` in Brainfuck.
    Decrement,
    /// `+` in Boolfuck.
    Flip,
    /// `.` in Brainfuck, `;` in Boolfuck.
    Output,
    /// `,`
    Input,
    /// `[`
    JumpIfZero,
    /// `]`
    JumpUnlessZero,
}

/// A language built from [`Op`]s.
pub trait Dialect {
    /// Human readable name used in logs and messages.
    const NAME: &'static str;
    /// Every symbol that carries meaning; everything else is a comment.
    const ALPHABET: &'static str;
    /// The I/O codec driven by [`Op::Output`] and [`Op::Input`].
    type Io: CellIo;

    /// Map a source symbol to its instruction.
    fn decode(symbol: char) -> Option<Op>;

    /// Keep only the dialect's instructions, in source order.
    fn parse(source: &str) -> Vec<Op> {
        source.chars().filter_map(Self::decode).collect()
    }

    /// Strip everything outside [`Dialect::ALPHABET`] from `source`.
    fn sanitize(source: &str) -> String {
        source.chars().filter(|c| Self::ALPHABET.contains(*c)).collect()
    }
}

/// Configurable-width Brainfuck: `+ - < > . , [ ]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Brainfuck;

impl Dialect for Brainfuck {
    const NAME: &'static str = "brainfuck";
    const ALPHABET: &'static str = "+-<>.,[]";
    type Io = TextIo;

    fn decode(symbol: char) -> Option<Op> {
        Some(match symbol {
            '>' => Op::Right,
            '<' => Op::Left,
            '+' => Op::Increment,
            '-' => Op::Decrement,
            '.' => Op::Output,
            ',' => Op::Input,
            '[' => Op::JumpIfZero,
            ']' => Op::JumpUnlessZero,
            _ => return None,
        })
    }
}

/// 1-bit Boolfuck: `+ ; , < > [ ]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolfuck;

impl Dialect for Boolfuck {
    const NAME: &'static str = "boolfuck";
    const ALPHABET: &'static str = "+;,<>[]";
    type Io = BitIo;

    fn decode(symbol: char) -> Option<Op> {
        Some(match symbol {
            '>' => Op::Right,
            '<' => Op::Left,
            '+' => Op::Flip,
            ';' => Op::Output,
            ',' => Op::Input,
            '[' => Op::JumpIfZero,
            ']' => Op::JumpUnlessZero,
            _ => return None,
        })
    }
}
