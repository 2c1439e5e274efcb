//! Cached, single-flight access to git repository facts.
//!
//! The centre of the crate is [`git::Git`]: seven repository facts, each
//! computed by one `git` invocation on first access and shared by every
//! caller afterwards. Process execution goes through the
//! [`ports::ProcessRunner`] port so the cache can run against real
//! processes, recorded cassettes or scripted responses.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod git;
pub mod logging;
pub mod ports;
pub mod single_flight;

use clap::Parser;

pub use error::{ExecError, QueryError};
pub use git::{Fact, Git, Query};

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or a fact cannot be read.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version
        Err(err) if !err.use_stderr() => {
            let _ = err.print();
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli)
}
