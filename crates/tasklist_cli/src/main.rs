//! `tasklist` command-line front end.
//!
//! # Responsibility
//! - Resolve configuration once, start logging, dispatch one command.
//! - Print errors as `error: ...` and exit non-zero.

mod commands;
mod handlers;

use clap::Parser;
use commands::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = handlers::run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
