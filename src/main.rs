use std::env;
use std::path::Path;

use bfbool::commands::{boolfuck, brainfuck};
use bfbool::logging::init_logging;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bfbool", version, about = "Run Brainfuck and Boolfuck programs")]
struct Cli {
    /// Log interpreter activity to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a Brainfuck program; `,` reads one line of stdin per call
    #[command(visible_alias = "bf")]
    Brainfuck(brainfuck::BrainfuckArgs),
    /// Run a Boolfuck program; output is printed when it halts
    #[command(visible_alias = "bool")]
    Boolfuck(boolfuck::BoolfuckArgs),
}

fn main() {
    // Program name for message prefixes, without the directory part
    let program = env::args()
        .next()
        .and_then(|arg0| Path::new(&arg0).file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| String::from("bfbool"));

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match cli.command {
        Command::Brainfuck(args) => brainfuck::run(&program, args),
        Command::Boolfuck(args) => boolfuck::run(&program, args),
    };

    std::process::exit(code);
}
