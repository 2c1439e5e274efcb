//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::git::Query;

/// Top-level CLI parser for `repo-facts`.
#[derive(Debug, Parser)]
#[command(
    name = "repo-facts",
    version,
    about = "Print cached facts about the current git repository"
)]
pub struct Cli {
    /// Log process invocations and failures to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// The fact to print.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands, one per fact plus `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Top-level directory of the working tree.
    GitPath,
    /// Path of the .git directory, relative to the current directory.
    GitDir,
    /// Checked-out branch.
    CurrentBranch,
    /// Configured core.hooksPath.
    HooksPath,
    /// Staged files, excluding deletions.
    StagedFiles,
    /// Files changed by the last commit, excluding deletions.
    LastCommitFiles,
    /// All tracked files.
    TrackedFiles,
    /// Every fact, queried concurrently.
    All,
}

impl Command {
    /// The single fact this command prints, or `None` for [`Command::All`].
    #[must_use]
    pub fn query(self) -> Option<Query> {
        match self {
            Command::GitPath => Some(Query::GitPath),
            Command::GitDir => Some(Query::GitDir),
            Command::CurrentBranch => Some(Query::CurrentBranch),
            Command::HooksPath => Some(Query::HooksPath),
            Command::StagedFiles => Some(Query::StagedFiles),
            Command::LastCommitFiles => Some(Query::LastCommitFiles),
            Command::TrackedFiles => Some(Query::TrackedFiles),
            Command::All => None,
        }
    }
}
