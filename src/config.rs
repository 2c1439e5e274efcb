//! Runtime settings read from the environment.

use std::path::PathBuf;

use crate::git::DEFAULT_PROGRAM;

/// Executable to invoke instead of `git`.
pub const GIT_ENV: &str = "REPO_FACTS_GIT";
/// Cassette file to record process interactions into.
pub const RECORD_ENV: &str = "REPO_FACTS_RECORD";
/// Cassette file to replay process interactions from.
pub const REPLAY_ENV: &str = "REPO_FACTS_REPLAY";
/// `tracing` filter directive, e.g. `repo_facts=debug`.
pub const LOG_ENV: &str = "REPO_FACTS_LOG";

/// Settings for one process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Executable to invoke for repository queries.
    pub program: String,
    /// Record process interactions to this cassette.
    pub record: Option<PathBuf>,
    /// Replay process interactions from this cassette.
    pub replay: Option<PathBuf>,
    /// Log filter override.
    pub log_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self { program: DEFAULT_PROGRAM.to_string(), record: None, replay: None, log_filter: None }
    }
}

impl Settings {
    /// Loads a `.env` file if present, then reads the process environment.
    #[must_use]
    pub fn load() -> Self {
        // A missing .env file is the common case.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            program: get(GIT_ENV).unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
            record: get(RECORD_ENV).map(PathBuf::from),
            replay: get(REPLAY_ENV).map(PathBuf::from),
            log_filter: get(LOG_ENV),
        }
    }
}
