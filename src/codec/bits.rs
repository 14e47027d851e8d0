//! Boolfuck I/O: bytes travel as bits, least significant bit first.

use super::{CellIo, OutputSink};
use crate::error::IoFault;

/// Converts between characters and the bit stream a Boolfuck program sees.
#[derive(Debug, Clone, Default)]
pub struct BitStreamCodec {
    /// Remaining input characters, last element is consumed next.
    input: Vec<char>,
    /// Bits of the current input byte, MSB first; popped from the end.
    pending: Vec<u8>,
    written: Vec<u8>,
}

impl BitStreamCodec {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().rev().collect(),
            pending: Vec::new(),
            written: Vec::new(),
        }
    }

    /// Next input bit. Once input is exhausted every bit is zero.
    pub fn read_bit(&mut self) -> u8 {
        if self.pending.is_empty() {
            let byte = self.input.pop().map_or(0, |c| (c as u32 & 0xFF) as u8);
            self.pending = (0..8).rev().map(|shift| (byte >> shift) & 1).collect();
        }
        self.pending.pop().unwrap_or(0)
    }

    pub fn write_bit(&mut self, bit: u8) {
        self.written.push(bit & 1);
    }

    /// Bits written so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Group written bits into bytes, first bit least significant.
    /// A short trailing group is decoded from the bits it has.
    pub fn pack(&self) -> String {
        self.written
            .chunks(8)
            .map(|chunk| {
                let value = chunk
                    .iter()
                    .enumerate()
                    .fold(0u32, |acc, (i, &bit)| acc | (u32::from(bit) << i));
                char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER)
            })
            .collect()
    }
}

/// The Boolfuck [`CellIo`]: output is buffered and flushed on halt.
pub struct BitIo {
    codec: BitStreamCodec,
    sink: OutputSink,
}

impl BitIo {
    pub fn new(input: &str, sink: OutputSink) -> Self {
        Self { codec: BitStreamCodec::new(input), sink }
    }

    pub fn codec(&self) -> &BitStreamCodec {
        &self.codec
    }
}

impl CellIo for BitIo {
    fn output(&mut self, value: i64) -> Result<(), IoFault> {
        self.codec.write_bit(u8::from(value != 0));
        Ok(())
    }

    fn input(&mut self) -> Result<Option<i64>, IoFault> {
        Ok(Some(i64::from(self.codec.read_bit())))
    }

    fn finish(&mut self) -> Result<(), IoFault> {
        for ch in self.codec.pack().chars() {
            (self.sink)(ch);
        }
        Ok(())
    }

    fn set_sink(&mut self, sink: OutputSink) {
        self.sink = sink;
    }

    fn transcript(&self) -> String {
        self.codec.pack()
    }
}
