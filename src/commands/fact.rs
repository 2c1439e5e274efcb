//! Print a single fact.

use super::Outcome;
use crate::git::{Fact, Git, Query};

/// Computes `query` and renders it, one list entry per line.
pub async fn run(git: &Git, query: Query) -> Outcome {
    match git.query(query).await {
        Ok(fact) => Outcome { output: render(&fact), error: None },
        Err(err) => Outcome { output: String::new(), error: Some(err.to_string()) },
    }
}

fn render(fact: &Fact) -> String {
    match fact {
        Fact::List(items) if items.is_empty() => String::new(),
        _ => format!("{fact}\n"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::adapters::scripted::ScriptedProcessRunner;

    #[tokio::test]
    async fn prints_list_one_per_line() {
        let runner = ScriptedProcessRunner::new().respond(Query::TrackedFiles.args(), 0, "a\nb\n");
        let git = Git::new(Arc::new(runner));

        let outcome = run(&git, Query::TrackedFiles).await;
        assert_eq!(outcome, Outcome { output: "a\nb\n".into(), error: None });
    }

    #[tokio::test]
    async fn empty_list_prints_nothing() {
        let runner = ScriptedProcessRunner::new().respond(Query::StagedFiles.args(), 0, "\n");
        let git = Git::new(Arc::new(runner));

        assert_eq!(run(&git, Query::StagedFiles).await.output, "");
    }

    #[tokio::test]
    async fn failure_becomes_error_message() {
        let git = Git::new(Arc::new(ScriptedProcessRunner::new()));

        let outcome = run(&git, Query::CurrentBranch).await;
        assert_eq!(outcome.error.as_deref(), Some("could not find current branch"));
    }
}
