// cuemux-cli/src/main.rs
//
// Entry point for the cuemux binary.
//
// Parses arguments, sets up logging and runs the conversion. Any error is
// printed through the terminal helpers and turns into exit code 1.

use clap::Parser;
use cuemux_cli::error::suggestion_for;
use cuemux_cli::{Cli, logging, run_convert};
use cuemux_core::terminal;
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run_convert(&cli) {
        terminal::print_error("Conversion failed", &e.to_string(), suggestion_for(&e));
        process::exit(1);
    }
}
