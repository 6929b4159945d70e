//! ledgerfile CLI entry point
//!
//! Parses arguments and dispatches through `cli::run`, which prints the JSON
//! response. On failure the error also goes to stderr and the process exits
//! with status 1.

use ledgerfile::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
