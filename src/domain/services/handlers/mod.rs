//! Post-processing for actions that materialize side tables.
//!
//! Unlike output decoding, a handler treats missing or malformed required
//! fields as fatal for the containing block.

mod create_asset;
mod fields;
mod register_validator_stake;

pub use create_asset::{asset_type_name, CreateAssetHandler};
pub use register_validator_stake::RegisterValidatorStakeHandler;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseTransaction;
use serde_json::Value;

use crate::domain::errors::HandlerError;
use crate::domain::services::decoder::DecodedOutput;

/// Everything a handler may read about the triggering action
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    pub action_type: u8,
    pub input: &'a Value,
    pub output: &'a DecodedOutput,
    pub sponsor: &'a str,
    pub tx_hash: &'a str,
    pub timestamp: DateTime<Utc>,
}

/// Side-effect routine keyed by action type code
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &'static str;

    async fn handle(
        &self,
        db: &DatabaseTransaction,
        ctx: &ActionContext<'_>,
    ) -> Result<(), HandlerError>;
}
