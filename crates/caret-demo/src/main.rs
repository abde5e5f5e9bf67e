#![forbid(unsafe_code)]

//! caret-demo binary entry point.

use caret_demo::app;
use caret_demo::cli;

fn main() {
    let opts = cli::Opts::parse();

    if let Err(e) = app::init_logging(&opts.log_file) {
        eprintln!("Failed to open log file {}: {e}", opts.log_file.display());
        std::process::exit(1);
    }

    if let Err(e) = app::run(&opts) {
        tracing::warn!(error = %e, "runtime error");
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}
