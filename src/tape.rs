//! Cell storage: value policy, growth policy and the data pointer.

use std::collections::VecDeque;

use crate::error::{InterpreterError, TapeFault};

/// Widest supported cell; values are held in an `i64`.
pub const MAX_CELL_BITS: u8 = 63;

/// Width, signedness and overflow behavior of every cell on a tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPolicy {
    bits: u8,
    wrapping: bool,
    min: i64,
    max: i64,
}

impl CellPolicy {
    pub fn new(bits: u8, signed: bool, wrapping: bool) -> Result<Self, InterpreterError> {
        if bits == 0 || bits > MAX_CELL_BITS {
            return Err(InterpreterError::InvalidConfig(format!(
                "cell width must be between 1 and {MAX_CELL_BITS} bits, got {bits}"
            )));
        }
        let (min, max) = if signed {
            let half = 1i64 << (bits - 1);
            (-half, half - 1)
        } else {
            (0, ((1i128 << bits) - 1) as i64)
        };
        Ok(Self { bits, wrapping, min, max })
    }

    /// The fixed 1-bit wrapping cell used by Boolfuck.
    pub fn bit() -> Self {
        Self { bits: 1, wrapping: true, min: 0, max: 1 }
    }

    pub fn wrapping(&self) -> bool {
        self.wrapping
    }

    pub fn min_value(&self) -> i64 {
        self.min
    }

    pub fn max_value(&self) -> i64 {
        self.max
    }

    /// Bring an externally supplied value (e.g. an input code point) into range.
    fn fit(&self, ptr: isize, value: i64) -> Result<i64, TapeFault> {
        if (self.min..=self.max).contains(&value) {
            return Ok(value);
        }
        if !self.wrapping {
            return Err(if value > self.max {
                TapeFault::Overflow { ptr, max: self.max }
            } else {
                TapeFault::Underflow { ptr, min: self.min }
            });
        }
        let span = 1i128 << self.bits;
        let offset = (value as i128 - self.min as i128).rem_euclid(span);
        Ok((offset + self.min as i128) as i64)
    }
}

/// How the tape grows and where the pointer may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapeLayout {
    /// Starts with one cell and appends on `>` up to `max_size` cells
    /// (`None` = unbounded). The pointer may go negative, but any access
    /// there fails.
    RightGrowable { max_size: Option<usize> },
    /// Pre-allocated `size` cells; the pointer wraps around both ends.
    Wrapping { size: usize },
    /// Grows on both ends; moving left of cell 0 prepends a cell.
    Bidirectional,
}

/// The memory tape of one interpreter.
#[derive(Debug, Clone)]
pub struct Tape {
    cells: VecDeque<i64>,
    pointer: isize,
    policy: CellPolicy,
    layout: TapeLayout,
}

impl Tape {
    pub fn new(policy: CellPolicy, layout: TapeLayout) -> Result<Self, InterpreterError> {
        let initial = match layout {
            TapeLayout::Wrapping { size: 0 } | TapeLayout::RightGrowable { max_size: Some(0) } => {
                return Err(InterpreterError::InvalidConfig(
                    "maximum tape size must be at least 1 cell".to_string(),
                ));
            }
            TapeLayout::Wrapping { size } => size,
            _ => 1,
        };
        let mut cells = VecDeque::new();
        cells.try_reserve_exact(initial).map_err(|e| {
            InterpreterError::InvalidConfig(format!("cannot allocate a tape of {initial} cells: {e}"))
        })?;
        cells.resize(initial, 0);
        Ok(Self {
            cells,
            pointer: 0,
            policy,
            layout,
        })
    }

    pub fn pointer(&self) -> isize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Value of the cell at `index`, if it exists.
    pub fn cell(&self, index: usize) -> Option<i64> {
        self.cells.get(index).copied()
    }

    /// All cells, leftmost first.
    pub fn cells(&self) -> impl Iterator<Item = i64> + '_ {
        self.cells.iter().copied()
    }

    pub fn move_right(&mut self) -> Result<(), TapeFault> {
        match self.layout {
            TapeLayout::RightGrowable { max_size } => {
                let next = self.pointer + 1;
                if next >= 0 && next as usize >= self.cells.len() {
                    if let Some(limit) = max_size.filter(|&limit| self.cells.len() >= limit) {
                        return Err(TapeFault::Exhausted { limit });
                    }
                    self.cells.push_back(0);
                    tracing::trace!(len = self.cells.len(), "tape grew right");
                }
                self.pointer = next;
            }
            TapeLayout::Wrapping { size } => {
                self.pointer = (self.pointer + 1) % size as isize;
            }
            TapeLayout::Bidirectional => {
                self.pointer += 1;
                if self.pointer as usize >= self.cells.len() {
                    self.cells.push_back(0);
                    tracing::trace!(len = self.cells.len(), "tape grew right");
                }
            }
        }
        Ok(())
    }

    pub fn move_left(&mut self) {
        match self.layout {
            TapeLayout::RightGrowable { .. } => self.pointer -= 1,
            TapeLayout::Wrapping { size } => {
                self.pointer = (self.pointer - 1).rem_euclid(size as isize);
            }
            TapeLayout::Bidirectional => {
                if self.pointer == 0 {
                    self.cells.push_front(0);
                    tracing::trace!(len = self.cells.len(), "tape grew left");
                } else {
                    self.pointer -= 1;
                }
            }
        }
    }

    /// Bound check shared by every cell access.
    fn index(&self) -> Result<usize, TapeFault> {
        usize::try_from(self.pointer)
            .ok()
            .filter(|&i| i < self.cells.len())
            .ok_or(TapeFault::OutOfRange { ptr: self.pointer })
    }

    pub fn read(&self) -> Result<i64, TapeFault> {
        let i = self.index()?;
        Ok(self.cells[i])
    }

    /// Store `value`, wrapping it into range when the policy allows.
    pub fn write(&mut self, value: i64) -> Result<(), TapeFault> {
        let i = self.index()?;
        self.cells[i] = self.policy.fit(self.pointer, value)?;
        Ok(())
    }

    pub fn increment(&mut self) -> Result<(), TapeFault> {
        let i = self.index()?;
        let cell = &mut self.cells[i];
        if *cell == self.policy.max {
            if !self.policy.wrapping {
                return Err(TapeFault::Overflow { ptr: self.pointer, max: self.policy.max });
            }
            *cell = self.policy.min;
        } else {
            *cell += 1;
        }
        Ok(())
    }

    pub fn decrement(&mut self) -> Result<(), TapeFault> {
        let i = self.index()?;
        let cell = &mut self.cells[i];
        if *cell == self.policy.min {
            if !self.policy.wrapping {
                return Err(TapeFault::Underflow { ptr: self.pointer, min: self.policy.min });
            }
            *cell = self.policy.max;
        } else {
            *cell -= 1;
        }
        Ok(())
    }

    pub fn flip(&mut self) -> Result<(), TapeFault> {
        let i = self.index()?;
        self.cells[i] = 1 - self.cells[i];
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn byte_tape(wrapping: bool, max_size: Option<usize>) -> Tape {
        let policy = CellPolicy::new(8, false, wrapping).unwrap();
        Tape::new(policy, TapeLayout::RightGrowable { max_size }).unwrap()
    }

    #[test]
    fn policy_bounds() {
        let u8p = CellPolicy::new(8, false, true).unwrap();
        assert_eq!((u8p.min_value(), u8p.max_value()), (0, 255));
        let i8p = CellPolicy::new(8, true, true).unwrap();
        assert_eq!((i8p.min_value(), i8p.max_value()), (-128, 127));
        let wide = CellPolicy::new(MAX_CELL_BITS, false, true).unwrap();
        assert_eq!(wide.max_value(), i64::MAX);
        assert!(CellPolicy::new(0, false, true).is_err());
        assert!(CellPolicy::new(64, false, true).is_err());
    }

    #[test]
    fn increment_wraps_across_boundary_and_back() {
        let mut tape = byte_tape(true, None);
        tape.write(255).unwrap();
        tape.increment().unwrap();
        assert_eq!(tape.read().unwrap(), 0);
        tape.decrement().unwrap();
        assert_eq!(tape.read().unwrap(), 255);
    }

    #[test]
    fn signed_cells_wrap_between_min_and_max() {
        let policy = CellPolicy::new(8, true, true).unwrap();
        let mut tape = Tape::new(policy, TapeLayout::RightGrowable { max_size: None }).unwrap();
        tape.write(127).unwrap();
        tape.increment().unwrap();
        assert_eq!(tape.read().unwrap(), -128);
    }

    #[test]
    fn overflow_without_wrapping_leaves_cell_unchanged() {
        let mut tape = byte_tape(false, None);
        tape.write(255).unwrap();
        assert_eq!(tape.increment(), Err(TapeFault::Overflow { ptr: 0, max: 255 }));
        assert_eq!(tape.read().unwrap(), 255);
    }

    #[test]
    fn underflow_without_wrapping_leaves_cell_unchanged() {
        let mut tape = byte_tape(false, None);
        assert_eq!(tape.decrement(), Err(TapeFault::Underflow { ptr: 0, min: 0 }));
        assert_eq!(tape.read().unwrap(), 0);
    }

    #[test]
    fn write_wraps_or_rejects_out_of_range_values() {
        let mut tape = byte_tape(true, None);
        tape.write(8364).unwrap();
        assert_eq!(tape.read().unwrap(), 8364 % 256);
        let mut strict = byte_tape(false, None);
        assert_eq!(strict.write(256), Err(TapeFault::Overflow { ptr: 0, max: 255 }));
    }

    #[test]
    fn oversized_wrapping_tape_is_rejected() {
        let policy = CellPolicy::new(8, false, true).unwrap();
        let result = Tape::new(policy, TapeLayout::Wrapping { size: usize::MAX / 2 });
        assert!(matches!(result, Err(InterpreterError::InvalidConfig(_))));
    }

    #[test]
    fn growth_stops_at_maximum() {
        let mut tape = byte_tape(true, Some(3));
        tape.move_right().unwrap();
        tape.move_right().unwrap();
        assert_eq!(tape.len(), 3);
        assert_eq!(tape.move_right(), Err(TapeFault::Exhausted { limit: 3 }));
        assert_eq!(tape.pointer(), 2);
        assert_eq!(tape.len(), 3);
    }

    #[test]
    fn negative_pointer_access_is_out_of_range() {
        let mut tape = byte_tape(true, None);
        tape.move_left();
        assert_eq!(tape.pointer(), -1);
        assert_eq!(tape.read(), Err(TapeFault::OutOfRange { ptr: -1 }));
        assert_eq!(tape.increment(), Err(TapeFault::OutOfRange { ptr: -1 }));
        // Coming back does not grow the tape.
        tape.move_right().unwrap();
        assert_eq!(tape.len(), 1);
        assert_eq!(tape.read().unwrap(), 0);
    }

    #[test]
    fn wrapping_layout_moves_modulo_size() {
        let policy = CellPolicy::new(8, false, true).unwrap();
        let mut tape = Tape::new(policy, TapeLayout::Wrapping { size: 4 }).unwrap();
        assert_eq!(tape.len(), 4);
        tape.move_left();
        assert_eq!(tape.pointer(), 3);
        tape.increment().unwrap();
        tape.move_right().unwrap();
        assert_eq!(tape.pointer(), 0);
        assert_eq!(tape.cell(3), Some(1));
    }

    #[test]
    fn bidirectional_layout_prepends_and_reanchors() {
        let mut tape = Tape::new(CellPolicy::bit(), TapeLayout::Bidirectional).unwrap();
        tape.flip().unwrap();
        tape.move_left();
        assert_eq!(tape.pointer(), 0);
        assert_eq!(tape.cells().collect::<Vec<_>>(), vec![0, 1]);
        tape.move_right().unwrap();
        tape.move_right().unwrap();
        assert_eq!(tape.pointer(), 2);
        assert_eq!(tape.cells().collect::<Vec<_>>(), vec![0, 1, 0]);
    }

    #[test]
    fn flip_toggles_a_bit() {
        let mut tape = Tape::new(CellPolicy::bit(), TapeLayout::Bidirectional).unwrap();
        tape.flip().unwrap();
        assert_eq!(tape.read().unwrap(), 1);
        tape.flip().unwrap();
        assert_eq!(tape.read().unwrap(), 0);
    }

    #[test]
    fn zero_sized_tapes_are_rejected() {
        let policy = CellPolicy::bit();
        assert!(Tape::new(policy, TapeLayout::Wrapping { size: 0 }).is_err());
        assert!(Tape::new(policy, TapeLayout::RightGrowable { max_size: Some(0) }).is_err());
    }

    proptest! {
        #[test]
        fn increment_then_decrement_is_identity(
            bits in 1u8..=16,
            signed in prop::bool::ANY,
            start in any::<i64>(),
        ) {
            let policy = CellPolicy::new(bits, signed, true).unwrap();
            let mut tape = Tape::new(policy, TapeLayout::RightGrowable { max_size: None }).unwrap();
            tape.write(start).unwrap();
            let before = tape.read().unwrap();
            tape.increment().unwrap();
            tape.decrement().unwrap();
            prop_assert_eq!(tape.read().unwrap(), before);
            tape.decrement().unwrap();
            tape.increment().unwrap();
            prop_assert_eq!(tape.read().unwrap(), before);
        }
    }
}
