//! Replaying adapters that serve recorded interactions.

pub mod process;

use serde::de::DeserializeOwned;

pub use process::ReplayingProcessRunner;

use crate::error::ExecError;

/// Turns a recorded `{"Ok": v}` / `{"Err": e}` output back into a result.
///
/// Mirror of `recording::record_result`. The recorded error is rebuilt as the
/// same [`ExecError`] variant the live runner returned.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, ExecError> {
    if let Some(err) = output.get("Err") {
        let err = serde_json::from_value(err.clone())
            .map_err(|e| ExecError::Replay(format!("unreadable recorded error: {e}")))?;
        return Err(err);
    }
    let Some(value) = output.get("Ok") else {
        return Err(ExecError::Replay(format!("expected `Ok` or `Err`, found {output}")));
    };
    serde_json::from_value(value.clone()).map_err(|e| ExecError::Replay(e.to_string()))
}
