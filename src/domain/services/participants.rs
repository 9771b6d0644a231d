//! Address extraction from decoded action outputs.
//!
//! Only string-valued `actor` and `receiver` fields are considered. Any
//! action type may carry them; outputs without them contribute nothing.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::domain::services::decoder::DecodedOutput;

const ACTOR_FIELD: &str = "actor";
const RECEIVER_FIELD: &str = "receiver";

fn address_field<'a>(output: &'a DecodedOutput, field: &str) -> Option<&'a str> {
    match output.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

/// Actors and receivers seen in one transaction's outputs, kept sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxParticipants {
    actors: BTreeSet<String>,
    receivers: BTreeSet<String>,
}

impl TxParticipants {
    pub fn record_output(&mut self, output: &DecodedOutput) {
        if let Some(actor) = address_field(output, ACTOR_FIELD) {
            self.actors.insert(actor.to_string());
        }
        if let Some(receiver) = address_field(output, RECEIVER_FIELD) {
            self.receivers.insert(receiver.to_string());
        }
    }

    pub fn actors(&self) -> Vec<String> {
        self.actors.iter().cloned().collect()
    }

    pub fn receivers(&self) -> Vec<String> {
        self.receivers.iter().cloned().collect()
    }
}

/// Distinct addresses touching a block: sponsors, actors and receivers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantSet {
    members: BTreeSet<String>,
}

impl ParticipantSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sponsor(&mut self, sponsor: &str) {
        if !sponsor.is_empty() {
            self.members.insert(sponsor.to_string());
        }
    }

    /// Merge the addresses collected for one transaction
    pub fn absorb(&mut self, tx: &TxParticipants) {
        self.members.extend(tx.actors.iter().cloned());
        self.members.extend(tx.receivers.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.members.contains(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn output(value: Value) -> DecodedOutput {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_receiver_only_output() {
        let mut tx = TxParticipants::default();
        tx.record_output(&output(json!({"receiver": "0xB", "amount": 5})));
        assert!(tx.actors().is_empty());
        assert_eq!(tx.receivers(), vec!["0xB".to_string()]);
    }

    #[test]
    fn test_non_string_fields_ignored() {
        let mut tx = TxParticipants::default();
        tx.record_output(&output(json!({"actor": 7, "receiver": ""})));
        assert_eq!(tx, TxParticipants::default());
    }

    #[test]
    fn test_block_set_is_distinct() {
        let mut t1 = TxParticipants::default();
        t1.record_output(&output(json!({"receiver": "0xB"})));

        let mut block = ParticipantSet::new();
        block.add_sponsor("0xA");
        block.absorb(&t1);
        block.add_sponsor("0xB");
        block.absorb(&TxParticipants::default());

        assert_eq!(block.len(), 2);
        assert!(block.contains("0xA"));
        assert!(block.contains("0xB"));
    }
}
