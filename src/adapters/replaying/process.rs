//! Replaying adapter for the `ProcessRunner` port.

use std::sync::{Mutex, PoisonError};

use super::replay_result;
use crate::adapters::recording::process::ProcessInput;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::ExecError;
use crate::ports::{BufferedOutput, ProcessFuture, ProcessRunner};

/// Serves recorded process results from a cassette instead of spawning.
///
/// A request the cassette cannot answer fails with [`ExecError::Replay`],
/// so it surfaces as that fact's error rather than aborting the run.
pub struct ReplayingProcessRunner {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingProcessRunner {
    /// Creates a replaying runner from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    fn next_output(
        &self,
        method: &str,
        program: &str,
        args: &str,
    ) -> Result<serde_json::Value, ExecError> {
        let input = serde_json::to_value(ProcessInput { program, args })
            .map_err(|e| ExecError::Replay(e.to_string()))?;
        let mut replayer = self.replayer.lock().unwrap_or_else(PoisonError::into_inner);
        replayer.next_output("process", method, &input).map_err(ExecError::Replay)
    }
}

impl ProcessRunner for ReplayingProcessRunner {
    fn run_buffered(&self, program: &str, args: &str) -> ProcessFuture<'_, BufferedOutput> {
        let output = self.next_output("run_buffered", program, args);
        Box::pin(async move { output.and_then(replay_result) })
    }

    fn run_direct(&self, program: &str, args: &str) -> ProcessFuture<'_, i32> {
        let output = self.next_output("run_direct", program, args);
        Box::pin(async move { output.and_then(replay_result) })
    }
}
