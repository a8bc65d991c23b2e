// shutoh-cli/src/main.rs
//
// Entry point for the `shutoh` binary.
//
// Responsibilities:
// - Parsing command-line arguments (`shutoh_cli::Cli`).
// - Initializing env_logger.
// - Dispatching to the selected command.
// - Reporting errors on stderr and setting the exit code.

use clap::Parser;
use shutoh_cli::{Cli, logging};
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    log::debug!("Parsed arguments: {:?}", cli);

    if let Err(e) = shutoh_cli::run(&cli) {
        log::debug!("Command failed: {:?}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
