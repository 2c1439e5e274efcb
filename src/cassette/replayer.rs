//! Serves recorded interactions back from a loaded cassette.

use std::collections::{BTreeMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Hands out recorded outputs per port/method.
///
/// Within a port/method pair, the oldest interaction whose input matches the
/// request is served first, so concurrent callers asking for different
/// commands do not depend on the order they happen to be polled in.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: BTreeMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Indexes a cassette's interactions by port and method.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: BTreeMap<(String, String), VecDeque<Interaction>> = BTreeMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Removes and returns the output of the next interaction recorded for
    /// `port`/`method` with the given input.
    ///
    /// # Errors
    ///
    /// Returns a message listing what is still available if no such
    /// interaction remains.
    pub fn next_output(
        &mut self,
        port: &str,
        method: &str,
        input: &serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            return Err(format!(
                "Cassette exhausted: no interactions recorded for {port}::{method}. \
                 Available: [{}]",
                available.join(", ")
            ));
        };

        let Some(pos) = queue.iter().position(|i| &i.input == input) else {
            let pending: Vec<String> = queue.iter().map(|i| i.input.to_string()).collect();
            return Err(format!(
                "Cassette exhausted: no remaining {port}::{method} interaction \
                 with input {input}. Unconsumed inputs: [{}]",
                pending.join(", ")
            ));
        };

        Ok(queue.remove(pos).map(|i| i.output).unwrap_or_default())
    }
}
