//! Brainfuck I/O: character output with multi-byte reconstruction and
//! line-oriented input.

use std::io::{self, BufRead};

use super::{CellIo, OutputSink};
use crate::config::EofBehavior;
use crate::error::IoFault;

/// Continuation bytes a single `.` may merge backwards over, so at most a
/// five byte sequence is reconstructed.
const MAX_CONTINUATIONS: usize = 4;

/// Supplies one line of input per `,`; `Ok(None)` signals end of input.
pub type LineSource = Box<dyn FnMut() -> io::Result<Option<String>> + Send>;

/// Read lines from stdin, without their line terminator.
pub fn stdin_lines() -> LineSource {
    Box::new(|| -> io::Result<Option<String>> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line.trim_end_matches(['\n', '\r']).to_string())),
        }
    })
}

fn to_char(value: i64) -> char {
    u32::try_from(value)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Rebuilds characters that a program writes one encoded byte per `.`.
///
/// Every output character is kept in a history. When a byte in
/// `0x80..=0xFF` arrives, the codec walks backwards through the history
/// looking for the leading byte of a multi-byte sequence, folding the
/// 6-bit payload of each continuation byte on the way. On success the
/// consumed bytes are replaced by the merged character, which is emitted.
/// Otherwise the byte is recorded but not emitted, since it is either the
/// start of a sequence whose tail is still to come or garbage.
#[derive(Debug, Clone, Default)]
pub struct ExtendedOutputCodec {
    enabled: bool,
    history: Vec<char>,
}

impl ExtendedOutputCodec {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, history: Vec::new() }
    }

    /// Decoded characters so far.
    pub fn history(&self) -> &[char] {
        &self.history
    }

    /// Feed one cell value; returns the character to emit, if any.
    pub fn push(&mut self, value: i64) -> Option<char> {
        if !self.enabled || !(0x80..=0xFF).contains(&value) {
            let ch = to_char(value);
            self.history.push(ch);
            return Some(ch);
        }

        match self.merge(value as u32) {
            Some(ch) => {
                self.history.push(ch);
                Some(ch)
            }
            None => {
                self.history.push(to_char(value));
                None
            }
        }
    }

    fn merge(&mut self, byte: u32) -> Option<char> {
        let mut payload = byte & 0x3F;
        let mut mask = 0x80u32;

        for n in 1..=MAX_CONTINUATIONS {
            let index = self.history.len().checked_sub(n)?;
            let prev = self.history[index] as u32;
            if prev > 0xFF || prev & 0x80 == 0 {
                return None;
            }

            mask |= mask >> 1;
            // Leading byte for `n` continuation bytes: `n + 1` ones, then a zero.
            let marker = (mask >> 1) & !mask;
            if prev & mask == mask && prev & marker == 0 {
                let merged = payload | ((prev & !mask) << (n * 6));
                self.history.truncate(index);
                return Some(char::from_u32(merged).unwrap_or(char::REPLACEMENT_CHARACTER));
            }

            if prev & 0xC0 != 0x80 {
                return None;
            }
            payload |= (prev & 0x3F) << (n * 6);
        }

        None
    }
}

/// The Brainfuck [`CellIo`]: decoded output to a sink, input from lines.
pub struct TextIo {
    codec: ExtendedOutputCodec,
    sink: OutputSink,
    lines: LineSource,
    eof: EofBehavior,
}

impl TextIo {
    pub fn new(extended: bool, eof: EofBehavior, sink: OutputSink, lines: LineSource) -> Self {
        Self { codec: ExtendedOutputCodec::new(extended), sink, lines, eof }
    }

    pub fn set_line_source(&mut self, lines: LineSource) {
        self.lines = lines;
    }

    pub fn codec(&self) -> &ExtendedOutputCodec {
        &self.codec
    }
}

impl CellIo for TextIo {
    fn output(&mut self, value: i64) -> Result<(), IoFault> {
        if let Some(ch) = self.codec.push(value) {
            (self.sink)(ch);
        }
        Ok(())
    }

    fn input(&mut self) -> Result<Option<i64>, IoFault> {
        match (self.lines)() {
            // An empty line stands for the newline that ended it.
            Ok(Some(line)) => Ok(Some(line.chars().next().unwrap_or('\n') as i64)),
            Ok(None) => Ok(match self.eof {
                EofBehavior::NoChange => None,
                EofBehavior::Zero => Some(0),
            }),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Err(IoFault::Interrupted),
            Err(e) => Err(IoFault::Io(e)),
        }
    }

    fn finish(&mut self) -> Result<(), IoFault> {
        Ok(())
    }

    fn set_sink(&mut self, sink: OutputSink) {
        self.sink = sink;
    }

    fn transcript(&self) -> String {
        self.codec.history.iter().collect()
    }
}
