//! CLI module for schema-builder
//!
//! Provides command-line interface for:
//! - show: Print the normalized bootstrap schema
//! - form: Print the derived form layout
//! - validate: Check a form-data document
//! - session: Edit the schema over line-delimited JSON

mod args;
mod commands;
mod errors;
mod io;
mod session;

pub use args::{Cli, Command};
pub use commands::{form_data, run, run_command, show_data, validate_file, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_response, ok_response, read_requests, write_line, write_response};
pub use session::{Request, Session};
