//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Replays a cassette with an independent queue per `(port, method)` pair.
///
/// Calls on different ports may interleave differently from the recording;
/// calls on the same method must arrive in the recorded order.
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Builds a replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues }
    }

    /// Number of interactions not yet served.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// Takes the next interaction for `port`/`method`.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the pair. The
    /// replayed session has diverged from the recording at that point.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_owned(), method.to_owned());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        };
        match queue.pop_front() {
            Some(interaction) => interaction,
            None => panic!(
                "Cassette exhausted: all interactions for port={port:?} method={method:?} \
                 have been consumed"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input: json!(null),
            output,
        }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), commit: "abc".into(), interactions }
    }

    #[test]
    fn serves_each_method_in_recorded_order() {
        let cassette = make_cassette(vec![
            interaction(0, "entropy", "pick", json!(1)),
            interaction(1, "registry", "exists", json!({"Ok": true})),
            interaction(2, "entropy", "pick", json!(2)),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.remaining(), 3);
        assert_eq!(replayer.next_interaction("registry", "exists").seq, 1);
        assert_eq!(replayer.next_interaction("entropy", "pick").output, json!(1));
        assert_eq!(replayer.next_interaction("entropy", "pick").output, json!(2));
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_method_panics() {
        let cassette = make_cassette(vec![interaction(0, "clock", "now", json!("x"))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("clock", "now");
        let _ = replayer.next_interaction("clock", "now");
    }

    #[test]
    #[should_panic(expected = "no interactions recorded")]
    fn unknown_port_panics() {
        let mut replayer = CassetteReplayer::new(&make_cassette(vec![]));
        let _ = replayer.next_interaction("registry", "insert");
    }
}
