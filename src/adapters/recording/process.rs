//! Recording adapter for the `ProcessRunner` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::{BufferedOutput, ProcessFuture, ProcessRunner};

/// Records process invocations while delegating to an inner runner.
pub struct RecordingProcessRunner {
    inner: Box<dyn ProcessRunner>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingProcessRunner {
    /// Wraps `inner`, recording every invocation into `recorder`.
    pub fn new(inner: Box<dyn ProcessRunner>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

/// Recorded input of a process invocation.
#[derive(Serialize)]
pub(crate) struct ProcessInput<'a> {
    pub(crate) program: &'a str,
    pub(crate) args: &'a str,
}

impl ProcessRunner for RecordingProcessRunner {
    fn run_buffered(&self, program: &str, args: &str) -> ProcessFuture<'_, BufferedOutput> {
        let (program, args) = (program.to_string(), args.to_string());
        Box::pin(async move {
            let result = self.inner.run_buffered(&program, &args).await;
            let input = ProcessInput { program: &program, args: &args };
            record_result(&self.recorder, "process", "run_buffered", &input, &result);
            result
        })
    }

    fn run_direct(&self, program: &str, args: &str) -> ProcessFuture<'_, i32> {
        let (program, args) = (program.to_string(), args.to_string());
        Box::pin(async move {
            let result = self.inner.run_direct(&program, &args).await;
            let input = ProcessInput { program: &program, args: &args };
            record_result(&self.recorder, "process", "run_direct", &input, &result);
            result
        })
    }
}
