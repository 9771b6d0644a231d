//! Decoder boundary: turns opaque bytes into blocks and action outputs.
//!
//! The chain codec itself lives outside this crate. `JsonDecoderFactory`
//! is the reference implementation used by the HTTP transport and tests:
//! blocks are JSON documents and action outputs are JSON objects.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::errors::DecodeError;
use crate::domain::models::ExecutedBlock;

/// Decoded action output as a key/value document
pub type DecodedOutput = Map<String, Value>;

/// Capability produced by initialising a decoder with genesis data
pub trait BlockDecoder: Send + Sync {
    /// Decode a whole executed block
    fn decode_block(&self, raw: &[u8]) -> Result<ExecutedBlock, DecodeError>;

    /// Decode one raw action output
    fn decode_output(&self, raw: &[u8]) -> Result<DecodedOutput, DecodeError>;
}

/// Builds a decoder bound to a chain's genesis parameters
pub trait DecoderFactory: Send + Sync {
    fn initialize(&self, genesis: &[u8]) -> Result<Arc<dyn BlockDecoder>, DecodeError>;
}

/// Factory for the JSON reference decoder
#[derive(Debug, Default, Clone)]
pub struct JsonDecoderFactory;

impl DecoderFactory for JsonDecoderFactory {
    fn initialize(&self, genesis: &[u8]) -> Result<Arc<dyn BlockDecoder>, DecodeError> {
        let genesis: Value =
            serde_json::from_slice(genesis).map_err(|e| DecodeError::Genesis(e.to_string()))?;
        if !genesis.is_object() {
            return Err(DecodeError::Genesis(
                "genesis must be a JSON object".to_string(),
            ));
        }
        Ok(Arc::new(JsonDecoder { genesis }))
    }
}

/// JSON decoder bound to one genesis document
#[derive(Debug, Clone)]
pub struct JsonDecoder {
    genesis: Value,
}

impl JsonDecoder {
    pub fn genesis(&self) -> &Value {
        &self.genesis
    }
}

impl BlockDecoder for JsonDecoder {
    fn decode_block(&self, raw: &[u8]) -> Result<ExecutedBlock, DecodeError> {
        let block: ExecutedBlock =
            serde_json::from_slice(raw).map_err(|e| DecodeError::Block(e.to_string()))?;
        if block.height == 0 {
            return Err(DecodeError::Block("block height must be at least 1".to_string()));
        }
        Ok(block)
    }

    fn decode_output(&self, raw: &[u8]) -> Result<DecodedOutput, DecodeError> {
        match serde_json::from_slice::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(DecodeError::Output(format!(
                "expected an object, got {}",
                other
            ))),
            Err(e) => Err(DecodeError::Output(e.to_string())),
        }
    }
}
