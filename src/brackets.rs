//! Bracket matching and the precomputed jump table.

use crate::dialect::Op;
use crate::error::{InterpreterError, UnmatchedBracketKind};

/// Matching bracket positions for O(1) jumps.
///
/// `jumps[i]` holds the matching index for the `[` or `]` at index `i`;
/// for non-bracket positions it is `None`. The same vector serves as both
/// the open→close map and its inverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTable {
    jumps: Vec<Option<usize>>,
}

impl BracketTable {
    /// Validate nesting in one left-to-right pass and record every pair.
    pub fn build(ops: &[Op]) -> Result<Self, InterpreterError> {
        let mut jumps: Vec<Option<usize>> = vec![None; ops.len()];
        let mut stack: Vec<usize> = Vec::new();

        for (i, op) in ops.iter().enumerate() {
            match op {
                Op::JumpIfZero => stack.push(i),
                Op::JumpUnlessZero => {
                    let Some(open_index) = stack.pop() else {
                        return Err(InterpreterError::UnmatchedBrackets {
                            ip: i,
                            kind: UnmatchedBracketKind::Close,
                        });
                    };
                    jumps[open_index] = Some(i);
                    jumps[i] = Some(open_index);
                }
                _ => {}
            }
        }

        if let Some(unmatched_open) = stack.last().copied() {
            return Err(InterpreterError::UnmatchedBrackets {
                ip: unmatched_open,
                kind: UnmatchedBracketKind::Open,
            });
        }

        Ok(Self { jumps })
    }

    /// Position of the `]` closing the `[` at `open`.
    pub fn close_for(&self, open: usize) -> Option<usize> {
        self.jumps
            .get(open)
            .copied()
            .flatten()
            .filter(|&close| close > open)
    }

    /// Position of the `[` opened for the `]` at `close`.
    pub fn open_for(&self, close: usize) -> Option<usize> {
        self.jumps
            .get(close)
            .copied()
            .flatten()
            .filter(|&open| open < close)
    }

    /// All `(open, close)` pairs, ordered by the open position.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.jumps
            .iter()
            .enumerate()
            .filter_map(|(i, j)| j.filter(|&j| j > i).map(|j| (i, j)))
    }

    /// Number of matched pairs.
    pub fn len(&self) -> usize {
        self.pairs().count()
    }

    pub fn is_empty(&self) -> bool {
        self.jumps.iter().all(Option::is_none)
    }
}
