//! Process execution port for invoking external executables.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::ExecError;

/// Boxed future type alias used by [`ProcessRunner`] to keep the trait dyn-compatible.
pub type ProcessFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ExecError>> + Send + 'a>>;

/// Result of a buffered invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferedOutput {
    /// The exit code of the process.
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
}

impl BufferedOutput {
    /// Returns `true` when the process exited with status zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external executables.
///
/// A non-zero exit status is not an error at this level; only a failure to
/// start the process is. Callers decide what an exit status means.
pub trait ProcessRunner: Send + Sync {
    /// Runs `program` with `args`, capturing standard output and error.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be launched.
    fn run_buffered(&self, program: &str, args: &str) -> ProcessFuture<'_, BufferedOutput>;

    /// Runs `program` with `args` attached to the current console and
    /// returns its exit code.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be launched.
    fn run_direct(&self, program: &str, args: &str) -> ProcessFuture<'_, i32>;
}

/// Splits an argument string into individual arguments.
///
/// Whitespace separates arguments except inside single or double quotes;
/// the quotes themselves are removed. `a "b c"` yields `["a", "b c"]`.
#[must_use]
pub fn split_args(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for ch in args.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    parts.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }
    if in_token {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_plain_arguments() {
        assert_eq!(
            split_args("diff --diff-filter=d --name-only --staged"),
            vec!["diff", "--diff-filter=d", "--name-only", "--staged"]
        );
    }

    #[test]
    fn keeps_quoted_arguments_together() {
        assert_eq!(
            split_args(r#"commit -m "fix the  build" --author='A B'"#),
            vec!["commit", "-m", "fix the  build", "--author=A B"]
        );
    }

    #[test]
    fn empty_quotes_yield_empty_argument() {
        assert_eq!(split_args(r#"config "" x"#), vec!["config", "", "x"]);
    }

    #[test]
    fn blank_input_yields_nothing() {
        assert!(split_args("   ").is_empty());
    }
}
