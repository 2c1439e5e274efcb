//! Collects interactions and writes them as a cassette file.

use std::path::PathBuf;

use chrono::Utc;
use tracing::debug;

use super::format::{Cassette, Interaction};
use crate::error::CassetteError;

/// Accumulates interactions in memory until [`save`](Self::save) is called.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    commit: String,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Creates a recorder that will write to `path`, stamping the cassette
    /// with the repository `commit` it was recorded against.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        commit: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            commit: commit.into(),
            interactions: Vec::new(),
        }
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Appends an interaction, assigning it the next sequence number.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        let seq = self.interactions.len() as u64;
        self.interactions.push(Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
    }

    /// Writes everything recorded so far to disk. May be called repeatedly.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be serialized or written.
    pub fn save(&self) -> Result<PathBuf, CassetteError> {
        let cassette = Cassette {
            name: self.name.clone(),
            recorded_at: Utc::now(),
            commit: self.commit.clone(),
            interactions: self.interactions.clone(),
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(CassetteError::Serialize)?;
        std::fs::write(&self.path, yaml)
            .map_err(|source| CassetteError::Write { path: self.path.clone(), source })?;
        debug!(path = %self.path.display(), interactions = self.len(), "wrote cassette");
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_writes_sequenced_interactions() {
        let dir = std::env::temp_dir().join("repo_facts_recorder_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "test-recording", "0123abcd");
        assert!(recorder.is_empty());
        recorder.record(
            "process",
            "run_buffered",
            json!({"program": "git", "args": "ls-files"}),
            json!({"Ok": {"exit_code": 0, "stdout": "a.rs\n", "stderr": ""}}),
        );
        recorder.record(
            "process",
            "run_direct",
            json!({"program": "git", "args": "status"}),
            json!({"Ok": 0}),
        );
        assert_eq!(recorder.len(), 2);

        let written = recorder.save().expect("save should succeed");
        assert_eq!(written, path);

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "test-recording");
        assert_eq!(cassette.commit, "0123abcd");
        assert_eq!(cassette.interactions[0].seq, 0);
        assert_eq!(cassette.interactions[1].seq, 1);
        assert_eq!(cassette.interactions[1].method, "run_direct");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let recorder = CassetteRecorder::new("/nonexistent/dir/x.cassette.yaml", "x", "unknown");
        assert!(matches!(recorder.save(), Err(CassetteError::Write { .. })));
    }
}
