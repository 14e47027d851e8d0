use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use clap::Args;

use crate::cli_util::{print_abort, print_interpreter_error};
use crate::{Dialect, Interpreter, InterpreterError, StepControl};

pub mod boolfuck;
pub mod brainfuck;

/// Where the program comes from and how long it may run.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Read the program from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Wall-clock timeout in milliseconds (fallback BFBOOL_TIMEOUT_MS; default unlimited)
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum interpreter steps before abort (fallback BFBOOL_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<u64>,

    /// Concatenated program code parts
    #[arg(value_name = "code", trailing_var_arg = true)]
    pub code: Vec<String>,
}

impl SourceArgs {
    /// Program text, or the exit code to stop with.
    pub fn load(&self, program: &str) -> Result<String, i32> {
        match (&self.file, self.code.is_empty()) {
            (None, true) => {
                eprintln!("{program}: no program given (pass \"<code>\" or --file <PATH>)");
                let _ = io::stderr().flush();
                Err(2)
            }
            (Some(_), false) => {
                eprintln!("{program}: cannot use positional code together with --file");
                let _ = io::stderr().flush();
                Err(2)
            }
            (Some(path), true) => fs::read_to_string(path).map_err(|e| {
                eprintln!("{program}: failed to read code file as UTF-8: {e}");
                let _ = io::stderr().flush();
                1
            }),
            (None, false) => Ok(self.code.join("")),
        }
    }

    /// Resolve limits: flags -> env -> defaults. A timeout of 0 disables it.
    fn limits(&self) -> (Option<u64>, Option<usize>) {
        let timeout_ms = self
            .timeout_ms
            .or_else(|| env_u64("BFBOOL_TIMEOUT_MS"))
            .filter(|&ms| ms > 0);
        let max_steps = self
            .max_steps
            .or_else(|| env_u64("BFBOOL_MAX_STEPS"))
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX));
        (timeout_ms, max_steps)
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|s| s.trim().parse::<u64>().ok())
}

/// Install a SIGINT (ctrl+c) handler that flushes and exits immediately.
/// A blocked input read cannot be resumed, so there is nothing to unwind.
pub(crate) fn install_interrupt_handler(program: &str) -> Result<(), i32> {
    ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(0);
    })
    .map_err(|e| {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
        1
    })
}

/// Report a construction failure against the sanitized program.
pub(crate) fn report_build_error<D: Dialect>(program: &str, code: &str, err: &InterpreterError) -> i32 {
    print_interpreter_error(Some(program), &D::sanitize(code), err);
    1
}

/// Run `interpreter` on a worker thread with cooperative cancellation,
/// then report the outcome. Returns the process exit code.
pub(crate) fn execute<D: Dialect>(program: &str, mut interpreter: Interpreter<D>, source: &SourceArgs) -> i32
where
    Interpreter<D>: Send + 'static,
{
    let (timeout_ms, max_steps) = source.limits();
    tracing::debug!(dialect = D::NAME, ?timeout_ms, ?max_steps, "starting worker");

    let code = interpreter.program().to_string();
    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel::<Result<(), InterpreterError>>();
    let ctrl = StepControl::new(max_steps, cancel.clone());

    thread::spawn(move || {
        let res = interpreter.run_with_control(ctrl);
        let _ = tx.send(res);
    });

    let outcome = match timeout_ms {
        Some(ms) => rx.recv_timeout(Duration::from_millis(ms)),
        None => rx.recv().map_err(|_| mpsc::RecvTimeoutError::Disconnected),
    };

    let exit_code = match outcome {
        Ok(Ok(())) => 0,
        Ok(Err(InterpreterError::StepLimitExceeded { limit })) => {
            print_abort(&format!("Execution aborted: step limit exceeded ({limit})"));
            1
        }
        Ok(Err(InterpreterError::Canceled)) | Err(mpsc::RecvTimeoutError::Timeout) => {
            cancel.store(true, Ordering::Relaxed);
            print_abort(&format!(
                "Execution aborted: wall-clock timeout exceeded ({} ms)",
                timeout_ms.unwrap_or_default()
            ));
            1
        }
        Ok(Err(other)) => {
            print_interpreter_error(Some(program), &code, &other);
            1
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => 1,
    };

    // For readability on a terminal, ensure output ends with a newline
    if io::stdout().is_terminal() {
        println!();
    }
    let _ = io::stdout().flush();
    exit_code
}
