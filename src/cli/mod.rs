//! CLI module for ledgerfile
//!
//! Provides command-line interface for:
//! - account: open, deposit, withdraw, close, show
//! - book: add, remove, show, list
//! - inspect: record file layout

mod args;
mod commands;
mod errors;
mod io;

pub use args::{AccountAction, BookAction, Cli, Command, InspectTarget, SortKey};
pub use commands::{account, book, inspect, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_envelope, ok_envelope, write_error, write_response};
