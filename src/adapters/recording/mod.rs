//! Recording adapters that capture interactions to cassettes.

pub mod process;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::warn;

pub use process::RecordingProcessRunner;

use crate::cassette::recorder::CassetteRecorder;

/// Records a `Result<T, E>` interaction using the Ok/Err JSON convention.
///
/// `Ok(v)` is stored as `{"Ok": v}` and `Err(e)` as `{"Err": e}`, with the
/// error serialized structurally so `replaying::replay_result` can rebuild it.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: Serialize,
    I: Serialize,
{
    let input_json = to_json(input, port, method);
    let output_json = match result {
        Ok(v) => serde_json::json!({ "Ok": to_json(v, port, method) }),
        Err(e) => serde_json::json!({ "Err": to_json(e, port, method) }),
    };

    let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
    guard.record(port, method, input_json, output_json);
}

fn to_json<V: Serialize>(value: &V, port: &str, method: &str) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        warn!(port, method, error = %e, "could not serialize interaction for recording");
        serde_json::Value::Null
    })
}
