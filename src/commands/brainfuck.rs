use clap::Args;

use super::{execute, install_interrupt_handler, report_build_error, SourceArgs};
use crate::config::load_user_config;
use crate::{Brainfuck, BrainfuckConfig, BrainfuckInterpreter, EofBehavior};

#[derive(Args, Debug)]
pub struct BrainfuckArgs {
    /// Cell width in bits, 1 to 63 (default 8)
    #[arg(long = "bits", value_name = "N")]
    pub bits: Option<u8>,

    /// Use signed cells
    #[arg(long = "signed")]
    pub signed: bool,

    /// Fail on cell overflow/underflow instead of wrapping
    #[arg(long = "no-cell-wrap")]
    pub no_cell_wrap: bool,

    /// Maximum number of tape cells (default 32768)
    #[arg(long = "max-tape", value_name = "N", conflicts_with = "unbounded_tape")]
    pub max_tape: Option<usize>,

    /// Let the tape grow without limit
    #[arg(long = "unbounded-tape")]
    pub unbounded_tape: bool,

    /// Pre-allocate the tape and wrap the pointer around its ends
    #[arg(long = "tape-wrap")]
    pub tape_wrap: bool,

    /// What `,` does once stdin is exhausted
    #[arg(long = "eof", value_enum, value_name = "MODE")]
    pub eof: Option<EofBehavior>,

    /// Print every byte as its own character instead of reconstructing
    /// multi-byte characters
    #[arg(long = "no-extended")]
    pub no_extended: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

impl BrainfuckArgs {
    /// Resolve configuration: flags -> user config file -> defaults.
    pub fn config(&self) -> BrainfuckConfig {
        self.apply(load_user_config())
    }

    fn apply(&self, mut cfg: BrainfuckConfig) -> BrainfuckConfig {
        if let Some(bits) = self.bits { cfg.bits = bits; }
        if self.signed { cfg.signed = true; }
        if self.no_cell_wrap { cfg.cell_wrapping = false; }
        if let Some(max) = self.max_tape { cfg.max_tape_size = Some(max); }
        if self.unbounded_tape { cfg.max_tape_size = None; }
        if self.tape_wrap { cfg.tape_wrapping = true; }
        if let Some(eof) = self.eof { cfg.eof = eof; }
        if self.no_extended { cfg.extended_output = false; }
        cfg
    }
}

pub fn run(program: &str, args: BrainfuckArgs) -> i32 {
    let code = match args.source.load(program) {
        Ok(code) => code,
        Err(exit_code) => return exit_code,
    };

    let config = args.config();
    tracing::debug!(?config, "resolved brainfuck config");

    let bf = match BrainfuckInterpreter::new(&code, config) {
        Ok(bf) => bf,
        Err(err) => return report_build_error::<Brainfuck>(program, &code, &err),
    };

    if let Err(exit_code) = install_interrupt_handler(program) {
        return exit_code;
    }

    execute(program, bf, &args.source)
}
