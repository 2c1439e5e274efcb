//! Live process runner using `tokio::process::Command`.

use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::ExecError;
use crate::ports::process::{split_args, BufferedOutput, ProcessFuture, ProcessRunner};

/// Live process runner that spawns real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveProcessRunner;

impl ProcessRunner for LiveProcessRunner {
    fn run_buffered(&self, program: &str, args: &str) -> ProcessFuture<'_, BufferedOutput> {
        let program = program.to_string();
        let argv = split_args(args);

        Box::pin(async move {
            debug!(%program, ?argv, "spawning buffered process");
            let output = Command::new(&program)
                .args(&argv)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
                .await
                .map_err(|e| ExecError::launch(&program, &e))?;

            Ok(BufferedOutput {
                exit_code: output.status.code().unwrap_or(-1),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        })
    }

    fn run_direct(&self, program: &str, args: &str) -> ProcessFuture<'_, i32> {
        let program = program.to_string();
        let argv = split_args(args);

        Box::pin(async move {
            debug!(%program, ?argv, "spawning direct process");
            let status = Command::new(&program)
                .args(&argv)
                .status()
                .await
                .map_err(|e| ExecError::launch(&program, &e))?;
            Ok(status.code().unwrap_or(-1))
        })
    }
}
