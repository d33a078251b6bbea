// fieldrules/src/main.rs
//! fieldrules entry point.
//!
//! Parses the command line, sets up logging and runs the selected command.

use clap::Parser;
use is_terminal::IsTerminal;
use std::io;
use std::process::ExitCode;

use fieldrules::cli::Cli;
use fieldrules::logger;
use fieldrules::ui::output::print_error_message;

fn main() -> ExitCode {
    let args = Cli::parse();
    logger::init_logger(logger::level_for(args.quiet, args.debug));

    match fieldrules::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let stderr = io::stderr();
            let supports_color = stderr.is_terminal();
            let _ = print_error_message(&mut stderr.lock(), &format!("{:#}", e), supports_color);
            ExitCode::FAILURE
        }
    }
}
