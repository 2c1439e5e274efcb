//! Cached repository facts backed by the `git` executable.
//!
//! A [`Git`] is built once per process run and shared by reference. Each
//! fact is computed on first access by a single `git` invocation; every
//! later or concurrent access sees the same value, or the same error.

pub mod query;

use std::sync::Arc;

use tracing::{debug, trace};

pub use query::{split_lines, Fact, Query};

use crate::error::{ExecError, QueryError};
use crate::ports::{BufferedOutput, ProcessRunner};
use crate::single_flight::SingleFlight;

/// Executable used when none is configured.
pub const DEFAULT_PROGRAM: &str = "git";

type TextCell = SingleFlight<String, QueryError>;
type ListCell = SingleFlight<Vec<String>, QueryError>;

/// Repository query cache.
pub struct Git {
    runner: Arc<dyn ProcessRunner>,
    program: Arc<str>,
    git_path: TextCell,
    git_dir: TextCell,
    current_branch: TextCell,
    hooks_path: TextCell,
    staged_files: ListCell,
    last_commit_files: ListCell,
    tracked_files: ListCell,
}

impl Git {
    /// Creates a cache that invokes `git` through `runner`.
    #[must_use]
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self::with_program(runner, DEFAULT_PROGRAM)
    }

    /// Creates a cache that invokes `program` instead of `git`.
    #[must_use]
    pub fn with_program(runner: Arc<dyn ProcessRunner>, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: Arc::from(program.into()),
            git_path: SingleFlight::new(),
            git_dir: SingleFlight::new(),
            current_branch: SingleFlight::new(),
            hooks_path: SingleFlight::new(),
            staged_files: SingleFlight::new(),
            last_commit_files: SingleFlight::new(),
            tracked_files: SingleFlight::new(),
        }
    }

    /// Executable this cache invokes.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Top-level directory of the working tree.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] for [`Query::GitPath`] if `git` fails.
    pub async fn git_path(&self) -> Result<String, QueryError> {
        self.text(&self.git_path, Query::GitPath).await
    }

    /// Path of the `.git` directory relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] for [`Query::GitDir`] if `git` fails.
    pub async fn git_dir_relative_path(&self) -> Result<String, QueryError> {
        self.text(&self.git_dir, Query::GitDir).await
    }

    /// Checked-out branch name; empty on a detached HEAD.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] for [`Query::CurrentBranch`] if `git` fails.
    pub async fn current_branch(&self) -> Result<String, QueryError> {
        self.text(&self.current_branch, Query::CurrentBranch).await
    }

    /// Configured `core.hooksPath`.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] for [`Query::HooksPath`] if `git` fails,
    /// including when the setting is absent (`git config` exits 1).
    pub async fn hooks_path(&self) -> Result<String, QueryError> {
        self.text(&self.hooks_path, Query::HooksPath).await
    }

    /// Staged paths, excluding deletions.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] for [`Query::StagedFiles`] if `git` fails.
    pub async fn staged_files(&self) -> Result<Vec<String>, QueryError> {
        self.list(&self.staged_files, Query::StagedFiles).await
    }

    /// Paths changed by the last commit, excluding deletions.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] for [`Query::LastCommitFiles`] if `git` fails.
    pub async fn last_commit_files(&self) -> Result<Vec<String>, QueryError> {
        self.list(&self.last_commit_files, Query::LastCommitFiles).await
    }

    /// Every tracked path.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] for [`Query::TrackedFiles`] if `git` fails.
    pub async fn tracked_files(&self) -> Result<Vec<String>, QueryError> {
        self.list(&self.tracked_files, Query::TrackedFiles).await
    }

    /// Looks up any fact by name, through the same caches as the accessors.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] for `query` if `git` fails.
    pub async fn query(&self, query: Query) -> Result<Fact, QueryError> {
        match query {
            Query::GitPath => self.git_path().await.map(Fact::Text),
            Query::GitDir => self.git_dir_relative_path().await.map(Fact::Text),
            Query::CurrentBranch => self.current_branch().await.map(Fact::Text),
            Query::HooksPath => self.hooks_path().await.map(Fact::Text),
            Query::StagedFiles => self.staged_files().await.map(Fact::List),
            Query::LastCommitFiles => self.last_commit_files().await.map(Fact::List),
            Query::TrackedFiles => self.tracked_files().await.map(Fact::List),
        }
    }

    /// Runs `git <args>` attached to the console and returns its exit code.
    /// Not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if `git` cannot be launched.
    pub async fn exec(&self, args: &str) -> Result<i32, ExecError> {
        self.runner.run_direct(&self.program, args).await
    }

    /// Runs `git <args>` capturing its output. Not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if `git` cannot be launched.
    pub async fn exec_buffered(&self, args: &str) -> Result<BufferedOutput, ExecError> {
        self.runner.run_buffered(&self.program, args).await
    }

    async fn text(&self, cell: &TextCell, query: Query) -> Result<String, QueryError> {
        if cell.is_started() {
            trace!(query = query.name(), "reusing cached fact");
        }
        let runner = Arc::clone(&self.runner);
        let program = Arc::clone(&self.program);
        cell.get_or_run(move || async move {
            let stdout = run_query(runner.as_ref(), &program, query).await?;
            Ok(stdout.trim().to_string())
        })
        .await
    }

    async fn list(&self, cell: &ListCell, query: Query) -> Result<Vec<String>, QueryError> {
        if cell.is_started() {
            trace!(query = query.name(), "reusing cached fact");
        }
        let runner = Arc::clone(&self.runner);
        let program = Arc::clone(&self.program);
        cell.get_or_run(move || async move {
            let stdout = run_query(runner.as_ref(), &program, query).await?;
            Ok(split_lines(&stdout))
        })
        .await
    }
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("program", &self.program)
            .field("current_branch", &self.current_branch)
            .field("staged_files", &self.staged_files)
            .finish_non_exhaustive()
    }
}

/// Runs the command behind `query` and returns its raw standard output.
async fn run_query(
    runner: &dyn ProcessRunner,
    program: &str,
    query: Query,
) -> Result<String, QueryError> {
    debug!(query = query.name(), args = query.args(), "querying git");
    let outcome = match runner.run_buffered(program, query.args()).await {
        Ok(output) if output.success() => return Ok(output.stdout),
        Ok(output) => ExecError::NonZeroExit { code: output.exit_code, stderr: output.stderr },
        Err(err) => err,
    };

    debug!(query = query.name(), error = %outcome, "git query failed");
    Err(QueryError { query, cause: outcome })
}
