use std::fmt;

/// Errors that can occur while building or running a program.
///
/// Every runtime variant carries the instruction index `ip` (into the
/// sanitized program) where execution stopped.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    /// Loops were not balanced; a matching `[` or `]` was not found.
    #[error("Unmatched bracket {kind} at instruction {ip}")]
    UnmatchedBrackets { ip: usize, kind: UnmatchedBracketKind },

    /// A cell was accessed while the data pointer was left of cell 0.
    #[error("Pointer out of range at instruction {ip} (ptr={ptr})")]
    PointerOutOfRange { ip: usize, ptr: isize },

    /// Incremented past the maximum cell value with cell wrapping disabled.
    #[error("Cell overflow at instruction {ip}: cell[{ptr}] already at maximum {max}")]
    CellOverflow { ip: usize, ptr: isize, max: i64 },

    /// Decremented past the minimum cell value with cell wrapping disabled.
    #[error("Cell underflow at instruction {ip}: cell[{ptr}] already at minimum {min}")]
    CellUnderflow { ip: usize, ptr: isize, min: i64 },

    /// The tape would have to grow past its configured maximum.
    #[error("Maximum tape length of {limit} exceeded at instruction {ip}")]
    TapeExhausted { ip: usize, limit: usize },

    /// The blocking input read was interrupted.
    #[error("Input interrupted at instruction {ip}")]
    InputInterrupted { ip: usize },

    /// An underlying I/O error occurred when reading input.
    #[error("I/O error at instruction {ip}: {source}")]
    Io { ip: usize, #[source] source: std::io::Error },

    /// The interpreter configuration was rejected before execution.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },

    /// Execution aborted due to cooperative cancellation (e.g., timeout)
    #[error("Execution aborted: cancelled")]
    Canceled,
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'['"),
            UnmatchedBracketKind::Close => write!(f, "']'"),
        }
    }
}

/// A tape failure, before the interpreter attaches the instruction index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TapeFault {
    #[error("cannot access index {ptr} on tape")]
    OutOfRange { ptr: isize },
    #[error("cell[{ptr}] exceeds maximum value {max}")]
    Overflow { ptr: isize, max: i64 },
    #[error("cell[{ptr}] exceeds minimum value {min}")]
    Underflow { ptr: isize, min: i64 },
    #[error("maximum tape length of {limit} exceeded")]
    Exhausted { limit: usize },
}

impl TapeFault {
    pub(crate) fn at(self, ip: usize) -> InterpreterError {
        match self {
            TapeFault::OutOfRange { ptr } => InterpreterError::PointerOutOfRange { ip, ptr },
            TapeFault::Overflow { ptr, max } => InterpreterError::CellOverflow { ip, ptr, max },
            TapeFault::Underflow { ptr, min } => InterpreterError::CellUnderflow { ip, ptr, min },
            TapeFault::Exhausted { limit } => InterpreterError::TapeExhausted { ip, limit },
        }
    }
}

/// An input/output channel failure, before the interpreter attaches the instruction index.
#[derive(Debug, thiserror::Error)]
pub enum IoFault {
    #[error("input interrupted")]
    Interrupted,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IoFault {
    pub(crate) fn at(self, ip: usize) -> InterpreterError {
        match self {
            IoFault::Interrupted => InterpreterError::InputInterrupted { ip },
            IoFault::Io(source) if source.kind() == std::io::ErrorKind::Interrupted => {
                InterpreterError::InputInterrupted { ip }
            }
            IoFault::Io(source) => InterpreterError::Io { ip, source },
        }
    }
}
