//! Interactive buddy allocator shell.
//!
//! `buddy-shell [TOTAL_UNITS]` reads commands from standard input. The pool
//! size falls back to `BUDDY_TOTAL_UNITS`, then to 8. Set `RUST_LOG=debug` to
//! trace splits and merges on standard error.

use std::io;
use std::process::ExitCode;

use buddy_unit_allocator::{Shell, ShellArgs, ShellConfig};
use clap::Parser;

fn main() -> ExitCode {
    env_logger::init();

    let args = ShellArgs::parse();
    let mut shell = match Shell::new(ShellConfig::from(args)) {
        Ok(shell) => shell,
        Err(err) => {
            eprintln!("ERROR: {err}");
            return ExitCode::from(2);
        }
    };

    let stdin = io::stdin();
    match shell.run(stdin.lock(), io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}
