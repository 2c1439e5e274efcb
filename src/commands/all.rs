//! Print every fact.

use std::fmt::Write as _;

use futures::future::join_all;

use super::Outcome;
use crate::git::{Fact, Git, Query};

/// Queries all facts concurrently and renders them as `name: value`.
///
/// A failing fact is reported inline; the outcome carries an error if any
/// fact failed, after all of them have been rendered.
pub async fn run(git: &Git) -> Outcome {
    let results = join_all(Query::ALL.map(|query| git.query(query))).await;

    let mut output = String::new();
    let mut failed = 0usize;
    for (query, result) in Query::ALL.iter().zip(results) {
        let name = query.name();
        match result {
            Ok(Fact::Text(text)) => {
                let _ = writeln!(output, "{name}: {text}");
            }
            Ok(Fact::List(items)) => {
                let _ = writeln!(output, "{name}:");
                for item in items {
                    let _ = writeln!(output, "  - {item}");
                }
            }
            Err(err) => {
                failed += 1;
                let _ = writeln!(output, "{name}: error: {err}");
            }
        }
    }

    let error = (failed > 0)
        .then(|| format!("{failed} of {} facts could not be read", Query::ALL.len()));
    Outcome { output, error }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::scripted::ScriptedProcessRunner;
    use crate::ports::ProcessRunner;

    #[tokio::test]
    async fn renders_every_fact_and_counts_failures() {
        let runner = Arc::new(
            ScriptedProcessRunner::new()
                .respond(Query::GitPath.args(), 0, "/repo\n")
                .respond(Query::GitDir.args(), 0, ".git\n")
                .respond(Query::CurrentBranch.args(), 0, "main\n")
                .respond(Query::HooksPath.args(), 1, "")
                .respond(Query::StagedFiles.args(), 0, "a.rs\nb.rs\n")
                .respond(Query::LastCommitFiles.args(), 0, "")
                .respond(Query::TrackedFiles.args(), 0, "a.rs\n"),
        );
        let git = Git::new(Arc::clone(&runner) as Arc<dyn ProcessRunner>);

        let outcome = run(&git).await;

        assert!(outcome.output.contains("git_path: /repo\n"));
        assert!(outcome.output.contains("current_branch: main\n"));
        assert!(outcome.output.contains("staged_files:\n  - a.rs\n  - b.rs\n"));
        assert!(outcome.output.contains("hooks_path: error: could not find hooks path\n"));
        assert_eq!(outcome.error.as_deref(), Some("1 of 7 facts could not be read"));
        assert_eq!(runner.calls().len(), Query::ALL.len());
    }
}
