//! The fetch-decode-execute loop shared by both dialects.

use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::brackets::BracketTable;
use crate::codec::bits::BitIo;
use crate::codec::text::{stdin_lines, ExtendedOutputCodec, TextIo};
use crate::codec::{stdout_sink, CellIo};
use crate::config::BrainfuckConfig;
use crate::dialect::{Boolfuck, Brainfuck, Dialect, Op};
use crate::error::{InterpreterError, TapeFault, UnmatchedBracketKind};
use crate::tape::{CellPolicy, Tape, TapeLayout};

/// Controls for cooperative cancellation and step limiting.
#[derive(Clone)]
pub struct StepControl {
    pub max_steps: Option<usize>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<usize>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { max_steps, cancel_flag }
    }
}

/// An interpreter for one program of dialect `D`.
///
/// The interpreter owns:
/// - the sanitized program and its bracket jump table,
/// - the memory tape and data pointer,
/// - the program counter,
/// - the dialect's I/O codec and its buffers.
pub struct Interpreter<D: Dialect> {
    source: String,
    ops: Vec<Op>,
    brackets: BracketTable,
    tape: Tape,
    io: D::Io,
    pc: usize,
    steps: usize,
    finished: bool,
}

/// Configurable-width Brainfuck.
pub type BrainfuckInterpreter = Interpreter<Brainfuck>;
/// 1-bit Boolfuck.
pub type BoolfuckInterpreter = Interpreter<Boolfuck>;

impl<D: Dialect> Interpreter<D> {
    fn build(code: &str, tape: Tape, io: D::Io) -> Result<Self, InterpreterError> {
        let source = D::sanitize(code);
        let ops = D::parse(&source);
        let brackets = BracketTable::build(&ops)?;
        Ok(Self {
            source,
            ops,
            brackets,
            tape,
            io,
            pc: 0,
            steps: 0,
            finished: false,
        })
    }

    /// The program with every non-instruction character removed.
    /// Error positions index into this string.
    pub fn program(&self) -> &str {
        &self.source
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Index of the next instruction to execute.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Instructions executed so far, loop jumps included.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_halted(&self) -> bool {
        self.pc >= self.ops.len()
    }

    /// Everything the program has produced so far, decoded.
    ///
    /// For Brainfuck this is the output history, which also keeps bytes that
    /// could not be merged into a character and so never reached the sink.
    pub fn output(&self) -> String {
        self.io.transcript()
    }

    /// Provide an output sink. When set, decoded characters go to this sink
    /// instead of stdout.
    pub fn set_output_sink<F>(&mut self, sink: F)
    where
        F: FnMut(char) + Send + 'static,
    {
        self.io.set_sink(Box::new(sink));
    }

    /// Execute the program until completion.
    ///
    /// Returns `Ok(())` on success or the first [`InterpreterError`] raised.
    pub fn run(&mut self) -> Result<(), InterpreterError> {
        self.execute(None)
    }

    /// Execute with cooperative cancellation and optional step limit.
    pub fn run_with_control(&mut self, step_control: StepControl) -> Result<(), InterpreterError> {
        self.execute(Some(&step_control))
    }

    fn execute(&mut self, step_control: Option<&StepControl>) -> Result<(), InterpreterError> {
        tracing::debug!(dialect = D::NAME, len = self.ops.len(), pc = self.pc, "run started");

        while self.pc < self.ops.len() {
            if let Some(ctrl) = step_control {
                if ctrl.cancel_flag.load(Ordering::Relaxed) {
                    return Err(InterpreterError::Canceled);
                }
                if let Some(max) = ctrl.max_steps {
                    if self.steps >= max {
                        return Err(InterpreterError::StepLimitExceeded { limit: max });
                    }
                }
            }
            self.step()?;
        }

        if !self.finished {
            self.finished = true;
            self.io.finish().map_err(|fault| fault.at(self.pc))?;
        }

        tracing::debug!(dialect = D::NAME, steps = self.steps, cells = self.tape.len(), "run finished");
        Ok(())
    }

    /// Execute the instruction at the program counter, then advance it.
    ///
    /// Branches overwrite the counter with the matching bracket's position
    /// so that the uniform advance lands just past it (`[`) or on the first
    /// instruction of the body (`]`).
    fn step(&mut self) -> Result<(), InterpreterError> {
        let ip = self.pc;
        let at = |fault: TapeFault| fault.at(ip);

        match self.ops[ip] {
            Op::Right => self.tape.move_right().map_err(at)?,
            Op::Left => self.tape.move_left(),
            Op::Increment => self.tape.increment().map_err(at)?,
            Op::Decrement => self.tape.decrement().map_err(at)?,
            Op::Flip => self.tape.flip().map_err(at)?,
            Op::Output => {
                let value = self.tape.read().map_err(at)?;
                self.io.output(value).map_err(|fault| fault.at(ip))?;
            }
            Op::Input => {
                // Bound check before blocking on input.
                self.tape.read().map_err(at)?;
                if let Some(value) = self.io.input().map_err(|fault| fault.at(ip))? {
                    self.tape.write(value).map_err(at)?;
                }
            }
            Op::JumpIfZero => {
                if self.tape.read().map_err(at)? == 0 {
                    self.pc = self.brackets.close_for(ip).ok_or(InterpreterError::UnmatchedBrackets {
                        ip,
                        kind: UnmatchedBracketKind::Open,
                    })?;
                }
            }
            Op::JumpUnlessZero => {
                if self.tape.read().map_err(at)? != 0 {
                    self.pc = self.brackets.open_for(ip).ok_or(InterpreterError::UnmatchedBrackets {
                        ip,
                        kind: UnmatchedBracketKind::Close,
                    })?;
                }
            }
        }

        self.steps += 1;
        self.pc += 1;
        Ok(())
    }
}

impl Interpreter<Brainfuck> {
    /// Create a Brainfuck interpreter. Output goes to stdout and `,` reads
    /// lines from stdin until other channels are set.
    pub fn new(code: &str, config: BrainfuckConfig) -> Result<Self, InterpreterError> {
        let tape = Tape::new(config.cell_policy()?, config.tape_layout())?;
        let io = TextIo::new(config.extended_output, config.eof, stdout_sink(), stdin_lines());
        Self::build(code, tape, io)
    }

    /// Provide an input provider. When set, `,` takes the first character of
    /// each line it returns; `Ok(None)` signals end of input.
    pub fn set_line_source<F>(&mut self, source: F)
    where
        F: FnMut() -> io::Result<Option<String>> + Send + 'static,
    {
        self.io.set_line_source(Box::new(source));
    }

    pub fn extended_output(&self) -> &ExtendedOutputCodec {
        self.io.codec()
    }
}

impl Interpreter<Boolfuck> {
    /// Create a Boolfuck interpreter reading bits from `input`. Output is
    /// packed into characters and written to stdout when the program halts.
    pub fn new(code: &str, input: &str) -> Result<Self, InterpreterError> {
        let tape = Tape::new(CellPolicy::bit(), TapeLayout::Bidirectional)?;
        Self::build(code, tape, BitIo::new(input, stdout_sink()))
    }

    /// Bits written by `;` so far.
    pub fn output_bits(&self) -> &[u8] {
        self.io.codec().written()
    }
}
