//! In-memory process runner with canned responses.
//!
//! Lets callers exercise code built on [`ProcessRunner`] without spawning
//! anything, and counts how often each argument string was invoked.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::error::ExecError;
use crate::ports::{BufferedOutput, ProcessFuture, ProcessRunner};

#[derive(Debug, Clone)]
enum Response {
    Output(BufferedOutput),
    LaunchFailure(String),
}

/// A single recorded call on a [`ScriptedProcessRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable that was requested.
    pub program: String,
    /// Argument string, verbatim.
    pub args: String,
    /// `true` for direct-mode invocations.
    pub direct: bool,
}

/// Process runner answering from a table keyed by argument string.
///
/// Each call yields to the scheduler once before answering so concurrent
/// callers genuinely overlap. Argument strings without a scripted response
/// fail as if the executable could not be launched.
#[derive(Debug, Default)]
pub struct ScriptedProcessRunner {
    responses: HashMap<String, Response>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedProcessRunner {
    /// Creates a runner with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `args` with the given exit code and standard output.
    #[must_use]
    pub fn respond(self, args: &str, exit_code: i32, stdout: &str) -> Self {
        self.respond_with_stderr(args, exit_code, stdout, "")
    }

    /// Like [`respond`](Self::respond), also writing `stderr`.
    #[must_use]
    pub fn respond_with_stderr(
        mut self,
        args: &str,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        self.responses.insert(
            args.to_string(),
            Response::Output(BufferedOutput {
                exit_code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            }),
        );
        self
    }

    /// Makes `args` fail to launch with `message`.
    #[must_use]
    pub fn fail_launch(mut self, args: &str, message: &str) -> Self {
        self.responses.insert(args.to_string(), Response::LaunchFailure(message.to_string()));
        self
    }

    /// All invocations so far, in call order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.lock_calls().clone()
    }

    /// Number of invocations made with exactly `args`.
    pub fn call_count(&self, args: &str) -> usize {
        self.lock_calls().iter().filter(|c| c.args == args).count()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<Invocation>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn answer(&self, program: &str, args: &str, direct: bool) -> Result<BufferedOutput, ExecError> {
        self.lock_calls().push(Invocation {
            program: program.to_string(),
            args: args.to_string(),
            direct,
        });
        match self.responses.get(args) {
            Some(Response::Output(output)) => Ok(output.clone()),
            Some(Response::LaunchFailure(message)) => {
                Err(ExecError::Launch { program: program.to_string(), message: message.clone() })
            }
            None => Err(ExecError::Launch {
                program: program.to_string(),
                message: format!("no scripted response for `{args}`"),
            }),
        }
    }
}

impl ProcessRunner for ScriptedProcessRunner {
    fn run_buffered(&self, program: &str, args: &str) -> ProcessFuture<'_, BufferedOutput> {
        let result = self.answer(program, args, false);
        Box::pin(async move {
            tokio::task::yield_now().await;
            result
        })
    }

    fn run_direct(&self, program: &str, args: &str) -> ProcessFuture<'_, i32> {
        let result = self.answer(program, args, true).map(|output| output.exit_code);
        Box::pin(async move {
            tokio::task::yield_now().await;
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answers_and_counts() {
        let runner = ScriptedProcessRunner::new().respond("ls-files", 0, "a.rs\n");

        let output = runner.run_buffered("git", "ls-files").await.unwrap();
        assert_eq!(output.stdout, "a.rs\n");
        assert_eq!(runner.run_direct("git", "ls-files").await.unwrap(), 0);

        assert_eq!(runner.call_count("ls-files"), 2);
        assert!(runner.calls()[1].direct);
    }

    #[tokio::test]
    async fn unscripted_args_fail_to_launch() {
        let runner = ScriptedProcessRunner::new();
        let err = runner.run_buffered("git", "status").await.unwrap_err();

        assert!(err.to_string().contains("no scripted response"));
    }
}
