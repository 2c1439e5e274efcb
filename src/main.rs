//! Binary entrypoint for the `repo-facts` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Record/replay is selected in commands::dispatch via REPO_FACTS_RECORD / REPO_FACTS_REPLAY.
    match repo_facts::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
