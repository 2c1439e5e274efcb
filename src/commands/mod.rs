//! Command dispatch and handlers.

pub mod all;
pub mod fact;

use crate::cli::{Cli, Command};
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::git::Git;
use crate::logging;

/// What a handler wants printed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    /// Text for stdout.
    pub output: String,
    /// Set when the command failed; printed to stderr by the caller.
    pub error: Option<String>,
}

/// Dispatch a parsed command to its handler.
///
/// Settings come from the environment (see [`crate::config`]). When
/// `REPO_FACTS_RECORD` is set, the cassette is written after the command
/// finishes, even on error.
///
/// # Errors
///
/// Returns an error string if setup fails or the selected fact cannot be
/// computed.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let settings = Settings::load();
    logging::init(cli.verbose, settings.log_filter.as_deref());

    let ctx = ServiceContext::from_settings(&settings).map_err(|e| e.to_string())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;

    let git = ctx.git();
    let outcome = runtime.block_on(dispatch_with_git(cli.command, &git));
    drop(git);

    if let Some(path) = ctx.finish().map_err(|e| e.to_string())? {
        eprintln!("Recording saved to: {}", path.display());
    }

    print!("{}", outcome.output);
    match outcome.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Dispatch a command against an existing repository cache.
pub async fn dispatch_with_git(command: Command, git: &Git) -> Outcome {
    match command.query() {
        Some(query) => fact::run(git, query).await,
        None => all::run(git).await,
    }
}
