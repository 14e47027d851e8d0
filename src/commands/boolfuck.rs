use std::io::{self, IsTerminal, Read, Write};

use clap::Args;

use super::{execute, install_interrupt_handler, report_build_error, SourceArgs};
use crate::{Boolfuck, BoolfuckInterpreter};

#[derive(Args, Debug)]
pub struct BoolfuckArgs {
    /// Input characters for `,` (otherwise piped stdin is used)
    #[arg(short = 'i', long = "input", value_name = "TEXT")]
    pub input: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(program: &str, args: BoolfuckArgs) -> i32 {
    let code = match args.source.load(program) {
        Ok(code) => code,
        Err(exit_code) => return exit_code,
    };

    let input = match args.input {
        Some(text) => text,
        None if !io::stdin().is_terminal() => {
            let mut s = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut s) {
                eprintln!("{program}: failed reading UTF-8 from stdin: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
            s
        }
        None => String::new(),
    };

    let bf = match BoolfuckInterpreter::new(&code, &input) {
        Ok(bf) => bf,
        Err(err) => return report_build_error::<Boolfuck>(program, &code, &err),
    };

    if let Err(exit_code) = install_interrupt_handler(program) {
        return exit_code;
    }

    execute(program, bf, &args.source)
}
