//! The repository facts and how their output is shaped.

use std::fmt;

use serde::Serialize;

/// One of the seven repository facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// Top-level directory of the working tree.
    GitPath,
    /// Path to the `.git` directory, relative to the current directory.
    GitDir,
    /// Name of the checked-out branch.
    CurrentBranch,
    /// Value of `core.hooksPath`.
    HooksPath,
    /// Staged paths, excluding deletions.
    StagedFiles,
    /// Paths changed by the last commit, excluding deletions.
    LastCommitFiles,
    /// Every tracked path.
    TrackedFiles,
}

impl Query {
    /// Every fact, in display order.
    pub const ALL: [Query; 7] = [
        Query::GitPath,
        Query::GitDir,
        Query::CurrentBranch,
        Query::HooksPath,
        Query::StagedFiles,
        Query::LastCommitFiles,
        Query::TrackedFiles,
    ];

    /// Arguments passed to `git` for this fact.
    #[must_use]
    pub const fn args(self) -> &'static str {
        match self {
            Query::GitPath => "rev-parse --show-toplevel",
            Query::GitDir => "rev-parse --path-format=relative --git-dir",
            Query::CurrentBranch => "branch --show-current",
            Query::HooksPath => "config --get core.hooksPath",
            Query::StagedFiles => "diff --diff-filter=d --name-only --staged",
            Query::LastCommitFiles => "diff --diff-filter=d --name-only HEAD^",
            Query::TrackedFiles => "ls-files",
        }
    }

    /// Stable identifier used on the command line and in log fields.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Query::GitPath => "git_path",
            Query::GitDir => "git_dir",
            Query::CurrentBranch => "current_branch",
            Query::HooksPath => "hooks_path",
            Query::StagedFiles => "staged_files",
            Query::LastCommitFiles => "last_commit_files",
            Query::TrackedFiles => "tracked_files",
        }
    }

    /// `true` for the facts that yield a list of paths.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Query::StagedFiles | Query::LastCommitFiles | Query::TrackedFiles)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Query::GitPath => "git path",
            Query::GitDir => "git directory",
            Query::CurrentBranch => "current branch",
            Query::HooksPath => "hooks path",
            Query::StagedFiles => "the staged files",
            Query::LastCommitFiles => "the last commit files",
            Query::TrackedFiles => "the committed files",
        };
        f.write_str(label)
    }
}

/// The value of a fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Fact {
    /// A single trimmed line.
    Text(String),
    /// Non-empty lines, in output order.
    List(Vec<String>),
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fact::Text(text) => f.write_str(text),
            Fact::List(items) => f.write_str(&items.join("\n")),
        }
    }
}

/// Trims the output and splits it into non-empty lines.
///
/// `\r\n`, `\r` and `\n` all count as line breaks.
#[must_use]
pub fn split_lines(output: &str) -> Vec<String> {
    output
        .trim()
        .split(['\r', '\n'])
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_accepts_mixed_line_breaks() {
        assert_eq!(split_lines("a.txt\nb.txt\r\n\nc.txt"), vec!["a.txt", "b.txt", "c.txt"]);
        assert_eq!(split_lines("x\ry\r\n"), vec!["x", "y"]);
    }

    #[test]
    fn split_lines_of_blank_output_is_empty() {
        assert!(split_lines("  \n\r\n ").is_empty());
    }

    #[test]
    fn split_lines_keeps_inner_spaces() {
        assert_eq!(split_lines("  my file.txt \nb"), vec!["my file.txt ", "b"]);
    }

    #[test]
    fn list_queries_are_the_diff_and_ls_files_ones() {
        let lists: Vec<Query> = Query::ALL.into_iter().filter(|q| q.is_list()).collect();
        assert_eq!(lists, vec![Query::StagedFiles, Query::LastCommitFiles, Query::TrackedFiles]);
    }

    #[test]
    fn list_fact_displays_one_entry_per_line() {
        let fact = Fact::List(vec!["a".into(), "b".into()]);
        assert_eq!(fact.to_string(), "a\nb");
    }
}
