//! Service context wiring the process port for one run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::adapters::live::LiveProcessRunner;
use crate::adapters::recording::RecordingProcessRunner;
use crate::adapters::replaying::ReplayingProcessRunner;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Settings;
use crate::error::CassetteError;
use crate::git::{Git, DEFAULT_PROGRAM};
use crate::ports::ProcessRunner;

/// Holds the process runner (and recorder, when recording) for a run.
///
/// Build one at startup and derive the repository cache from it with
/// [`ServiceContext::git`].
pub struct ServiceContext {
    /// Process runner for invoking executables.
    pub process: Arc<dyn ProcessRunner>,
    /// Executable used for repository queries.
    pub program: String,
    /// Written to disk by [`finish`](Self::finish) or on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a context that spawns real processes.
    #[must_use]
    pub fn live() -> Self {
        Self::with_runner(Arc::new(LiveProcessRunner))
    }

    /// Creates a context around an arbitrary runner.
    #[must_use]
    pub fn with_runner(process: Arc<dyn ProcessRunner>) -> Self {
        Self { process, program: DEFAULT_PROGRAM.to_string(), recorder: None }
    }

    /// Creates a context that spawns real processes and records every
    /// invocation to a cassette at `path`, stamped with the current `HEAD`.
    #[must_use]
    pub fn recording(path: &Path) -> Self {
        Self::recording_with(path, &head_commit(), Box::new(LiveProcessRunner))
    }

    /// Creates a recording context around `inner` for a repository at `commit`.
    #[must_use]
    pub fn recording_with(path: &Path, commit: &str, inner: Box<dyn ProcessRunner>) -> Self {
        let recorder = CassetteRecorder::new(path, "repo-facts-session", commit);
        let recorder = Arc::new(Mutex::new(recorder));
        let runner = RecordingProcessRunner::new(inner, Arc::clone(&recorder));
        Self {
            process: Arc::new(runner),
            program: DEFAULT_PROGRAM.to_string(),
            recorder: Some(recorder),
        }
    }

    /// Creates a context that serves process results from a cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, CassetteError> {
        let cassette = Cassette::load(path)?;
        debug!(
            path = %path.display(),
            commit = %cassette.commit,
            interactions = cassette.interactions.len(),
            "replaying cassette"
        );
        let runner = ReplayingProcessRunner::new(CassetteReplayer::new(&cassette));
        Ok(Self::with_runner(Arc::new(runner)))
    }

    /// Chooses live, recording or replaying mode from `settings`.
    /// Replaying takes precedence over recording.
    ///
    /// # Errors
    ///
    /// Returns an error if a replay cassette cannot be loaded.
    pub fn from_settings(settings: &Settings) -> Result<Self, CassetteError> {
        let ctx = match (&settings.replay, &settings.record) {
            (Some(replay), _) => Self::replaying(replay)?,
            (None, Some(record)) => Self::recording(record),
            (None, None) => Self::live(),
        };
        Ok(ctx.with_program(settings.program.clone()))
    }

    /// Sets the executable used for repository queries.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Builds the repository cache for this run.
    #[must_use]
    pub fn git(&self) -> Git {
        Git::with_program(Arc::clone(&self.process), self.program.clone())
    }

    /// Writes the recording, if any, and returns where it went.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn finish(mut self) -> Result<Option<PathBuf>, CassetteError> {
        match self.recorder.take() {
            Some(recorder) => save(&recorder).map(Some),
            None => Ok(None),
        }
    }
}

/// Hash of the current `HEAD`, or `"unknown"` outside a repository.
fn head_commit() -> String {
    std::process::Command::new(DEFAULT_PROGRAM)
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_string())
        .unwrap_or_else(|| {
            warn!("could not resolve HEAD for the cassette header");
            "unknown".to_string()
        })
}

fn save(recorder: &Mutex<CassetteRecorder>) -> Result<PathBuf, CassetteError> {
    recorder.lock().unwrap_or_else(PoisonError::into_inner).save()
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            if let Err(e) = save(&recorder) {
                warn!(error = %e, "failed to write cassette");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::scripted::ScriptedProcessRunner;
    use crate::git::Query;

    #[tokio::test]
    async fn recording_then_replaying_yields_the_same_facts() {
        let dir = std::env::temp_dir().join("repo_facts_ctx_roundtrip");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.cassette.yaml");

        let scripted = ScriptedProcessRunner::new()
            .respond(Query::CurrentBranch.args(), 0, "feature/x\n")
            .respond(Query::StagedFiles.args(), 0, "a.rs\nb.rs\n");
        let ctx = ServiceContext::recording_with(&path, "c0ffee", Box::new(scripted));
        let git = ctx.git();
        let branch = git.current_branch().await.unwrap();
        let staged = git.staged_files().await.unwrap();
        drop(git);
        assert_eq!(ctx.finish().unwrap(), Some(path.clone()));

        assert_eq!(Cassette::load(&path).unwrap().commit, "c0ffee");

        let replay = ServiceContext::replaying(&path).unwrap();
        let git = replay.git();
        assert_eq!(git.staged_files().await.unwrap(), staged);
        assert_eq!(git.current_branch().await.unwrap(), branch);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn drop_writes_the_recording() {
        let dir = std::env::temp_dir().join("repo_facts_ctx_drop");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dropped.cassette.yaml");

        let inner = Box::new(ScriptedProcessRunner::new());
        drop(ServiceContext::recording_with(&path, "c0ffee", inner));

        assert!(Cassette::load(&path).unwrap().interactions.is_empty());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn head_commit_is_never_empty() {
        let commit = head_commit();
        assert!(!commit.is_empty());
        assert!(!commit.contains('\n'));
    }

    #[test]
    fn settings_choose_program_and_mode() {
        let settings = Settings { program: "/usr/local/bin/git".into(), ..Settings::default() };
        let ctx = ServiceContext::from_settings(&settings).unwrap();

        assert_eq!(ctx.git().program(), "/usr/local/bin/git");
        assert!(ctx.finish().unwrap().is_none());
    }

    #[test]
    fn missing_replay_cassette_is_an_error() {
        let settings = Settings {
            replay: Some(PathBuf::from("/nonexistent/replay.cassette.yaml")),
            ..Settings::default()
        };
        assert!(matches!(
            ServiceContext::from_settings(&settings),
            Err(CassetteError::Read { .. })
        ));
    }
}
