//! Genesis handling: persisted document and the height-1 reset.

use std::time::Duration;

use sea_orm::ConnectionTrait;
use serde_json::{json, Value};

use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::repositories::genesis_repository;
use crate::infrastructure::persistence::schema;
use crate::infrastructure::persistence::timeout::bounded;
use crate::utils::logging;

/// Document stored for a genesis payload.
///
/// JSON payloads are kept as-is; anything else is stored hex-encoded so
/// the exact bytes can be recovered.
pub fn genesis_document(genesis: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(genesis) {
        Ok(value) => value,
        Err(_) => json!({ "raw_hex": hex::encode(genesis) }),
    }
}

pub(crate) async fn store_genesis<C: ConnectionTrait>(
    db: &C,
    genesis: &[u8],
    timeout: Duration,
) -> Result<(), DbError> {
    let document = genesis_document(genesis);
    bounded(
        "store_genesis",
        timeout,
        genesis_repository::replace_genesis(db, document),
    )
    .await
}

/// Wipe every derived table ahead of a height-1 block
pub(crate) async fn reset_for_genesis<C: ConnectionTrait>(
    db: &C,
    timeout: Duration,
) -> Result<(), DbError> {
    logging::log_warning("Genesis block received, resetting derived tables");
    bounded("genesis_reset", timeout, schema::reset_derived_tables(db)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_genesis_kept_verbatim() {
        let doc = genesis_document(br#"{"chain_id":"nuklai","min_fee":1}"#);
        assert_eq!(doc, json!({"chain_id": "nuklai", "min_fee": 1}));
    }

    #[test]
    fn test_binary_genesis_hex_encoded() {
        let doc = genesis_document(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(doc, json!({"raw_hex": "deadbeef"}));
    }
}
