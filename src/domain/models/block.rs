//! Finalized blocks as handed over by the decoder boundary.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A finalized block together with the per-transaction execution results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedBlock {
    /// Block height, starting at 1 for genesis
    pub height: u64,
    pub block_hash: String,
    pub parent_hash: String,
    pub state_root: String,
    /// Wall-clock block timestamp in unix milliseconds
    pub timestamp_ms: i64,
    /// Serialized block size in bytes
    pub size: u64,
    pub transactions: Vec<Transaction>,
    /// Index-aligned with `transactions`; may be shorter
    #[serde(default)]
    pub results: Vec<ExecutionResult>,
}

impl ExecutedBlock {
    /// Returns true for the height that triggers a full reset
    pub fn is_genesis(&self) -> bool {
        self.height == 1
    }

    /// Block timestamp as UTC
    pub fn timestamp(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp_ms)
            .single()
            .unwrap_or_default()
    }

    /// Execution result for the transaction at `index`, if one was delivered
    pub fn result_for(&self, index: usize) -> Option<&ExecutionResult> {
        self.results.get(index)
    }

    /// Average transaction size in bytes, 0 for empty blocks
    pub fn avg_tx_size(&self) -> f64 {
        if self.transactions.is_empty() {
            0.0
        } else {
            self.size as f64 / self.transactions.len() as f64
        }
    }
}

/// A signed transaction carrying an ordered list of actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub tx_hash: String,
    pub sponsor: String,
    pub actions: Vec<Action>,
    pub max_fee: u64,
}

/// A single state-changing operation inside a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Numeric action type code
    pub type_id: u8,
    /// Decoded action input as a key/value document
    #[serde(default)]
    pub input: Value,
}

/// Outcome of executing one transaction
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    /// Fee actually consumed
    pub fee: u64,
    /// Raw per-action outputs, index-aligned with the actions
    #[serde(default, with = "hex_outputs")]
    pub outputs: Vec<Vec<u8>>,
}

mod hex_outputs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(outputs: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        outputs
            .iter()
            .map(hex::encode)
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .into_iter()
            .map(|s| hex::decode(s.trim_start_matches("0x")).map_err(serde::de::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_with(size: u64, txs: usize) -> ExecutedBlock {
        ExecutedBlock {
            height: 7,
            block_hash: "b7".to_string(),
            parent_hash: "b6".to_string(),
            state_root: "root".to_string(),
            timestamp_ms: 1_700_000_000_000,
            size,
            transactions: (0..txs)
                .map(|i| Transaction {
                    tx_hash: format!("tx{}", i),
                    sponsor: "0xA".to_string(),
                    actions: vec![],
                    max_fee: 0,
                })
                .collect(),
            results: vec![],
        }
    }

    #[test]
    fn test_avg_tx_size() {
        assert_eq!(block_with(300, 0).avg_tx_size(), 0.0);
        assert_eq!(block_with(300, 3).avg_tx_size(), 100.0);
    }

    #[test]
    fn test_timestamp_conversion() {
        let block = block_with(0, 0);
        assert_eq!(block.timestamp().timestamp(), 1_700_000_000);
        assert!(!block.is_genesis());
    }

    #[test]
    fn test_outputs_hex_encoding() {
        let result = ExecutionResult {
            success: true,
            fee: 3,
            outputs: vec![vec![0xde, 0xad]],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outputs"][0], "dead");

        let back: ExecutionResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
