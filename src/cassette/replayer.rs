//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Replays a cassette, one queue per `port::method` pair.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<String, VecDeque<Interaction>>,
}

fn queue_key(port: &str, method: &str) -> String {
    format!("{port}::{method}")
}

impl CassetteReplayer {
    /// Index a loaded cassette for replay.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<String, VecDeque<Interaction>> = HashMap::new();
        let mut interactions = cassette.interactions.clone();
        interactions.sort_by_key(|i| i.seq);
        for interaction in interactions {
            queues
                .entry(queue_key(&interaction.port, &interaction.method))
                .or_default()
                .push_back(interaction);
        }
        Self { queues }
    }

    /// Take the next interaction recorded for `port` and `method`.
    ///
    /// # Errors
    ///
    /// Returns an error naming what the cassette holds when nothing is left
    /// for this pair.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Result<Interaction, String> {
        let key = queue_key(port, method);
        match self.queues.get_mut(&key).and_then(VecDeque::pop_front) {
            Some(interaction) => Ok(interaction),
            None => {
                let mut available: Vec<&str> = self
                    .queues
                    .iter()
                    .filter(|(_, q)| !q.is_empty())
                    .map(|(k, _)| k.as_str())
                    .collect();
                available.sort_unstable();
                Err(format!(
                    "Cassette exhausted: no interactions left for {key}. Remaining: [{}]",
                    available.join(", ")
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, text: &str) -> Interaction {
        Interaction {
            seq,
            port: "generator".into(),
            method: "generate_content".into(),
            input: json!({"text": text}),
            output: json!({"Ok": {"mime_type": "image/jpeg", "data": "AAEC"}}),
        }
    }

    fn cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), commit: "abc".into(), interactions }
    }

    #[test]
    fn replays_by_sequence_number() {
        let mut replayer =
            CassetteReplayer::new(&cassette(vec![interaction(1, "second"), interaction(0, "first")]));

        let first = replayer.next_interaction("generator", "generate_content").unwrap();
        assert_eq!(first.input["text"], "first");
        let second = replayer.next_interaction("generator", "generate_content").unwrap();
        assert_eq!(second.input["text"], "second");
    }

    #[test]
    fn exhausted_queue_is_an_error() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![interaction(0, "only")]));
        replayer.next_interaction("generator", "generate_content").unwrap();

        let err = replayer.next_interaction("generator", "generate_content").unwrap_err();
        assert!(err.contains("Cassette exhausted"));
    }

    #[test]
    fn unknown_pair_lists_what_remains() {
        let mut replayer = CassetteReplayer::new(&cassette(vec![interaction(0, "only")]));
        let err = replayer.next_interaction("uploader", "put").unwrap_err();
        assert!(err.contains("uploader::put"));
        assert!(err.contains("generator::generate_content"));
    }
}
