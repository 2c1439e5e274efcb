//! Error types for process execution, repository queries and cassettes.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::git::Query;

/// Failure of a single process invocation.
///
/// `Clone` so that a memoized failure can be handed to every caller that
/// awaits the same fact, and serializable so cassettes store it as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecError {
    /// The executable could not be started (missing binary, permissions, ...).
    #[error("failed to launch `{program}`: {message}")]
    Launch {
        /// Executable that was requested.
        program: String,
        /// OS-level reason for the failure.
        message: String,
    },

    /// The process ran but exited with a non-zero status.
    #[error("exit code: {code}")]
    NonZeroExit {
        /// Exit status reported by the process.
        code: i32,
        /// Captured standard error, if any.
        stderr: String,
    },

    /// A recorded interaction could not be turned back into a result.
    #[error("cassette replay failed: {0}")]
    Replay(String),
}

impl ExecError {
    /// Builds a launch failure from the I/O error returned by the OS.
    #[must_use]
    pub fn launch(program: &str, err: &io::Error) -> Self {
        Self::Launch { program: program.to_string(), message: err.to_string() }
    }
}

/// A repository fact could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not find {query}")]
pub struct QueryError {
    /// The fact that failed.
    pub query: Query,
    /// Underlying process failure.
    #[source]
    pub cause: ExecError,
}

/// Errors raised while loading or writing cassette files.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum CassetteError {
    #[error("failed to read cassette {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse cassette {}: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_yaml::Error },

    #[error("failed to write cassette {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to serialize cassette: {0}")]
    Serialize(#[source] serde_yaml::Error),
}
