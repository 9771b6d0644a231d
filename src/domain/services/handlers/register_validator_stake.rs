use async_trait::async_trait;
use sea_orm::DatabaseTransaction;

use super::fields::Fields;
use super::{ActionContext, ActionHandler};
use crate::domain::errors::HandlerError;
use crate::infrastructure::persistence::entities::validator_stake;
use crate::infrastructure::persistence::repositories::validator_stake_repository;

const ACTION: &str = "RegisterValidatorStake";

/// Materializes a validator stake row from the registration output
#[derive(Debug, Default, Clone, Copy)]
pub struct RegisterValidatorStakeHandler;

impl RegisterValidatorStakeHandler {
    pub fn build_stake(ctx: &ActionContext<'_>) -> Result<validator_stake::Model, HandlerError> {
        let output = Fields::of_map(ACTION, ctx.output);

        Ok(validator_stake::Model {
            node_id: output.require_str("node_id")?.to_string(),
            stake_start_block: output.require_i64("stake_start_block")?,
            actor: ctx.sponsor.to_string(),
            stake_end_block: output.require_i64("stake_end_block")?,
            staked_amount: output.require_i64("staked_amount")?,
            delegation_fee_rate: output.require_i64("delegation_fee_rate")?,
            reward_address: output.require_str("reward_address")?.to_string(),
            tx_hash: ctx.tx_hash.to_string(),
            timestamp: ctx.timestamp,
        })
    }
}

#[async_trait]
impl ActionHandler for RegisterValidatorStakeHandler {
    fn name(&self) -> &'static str {
        ACTION
    }

    async fn handle(
        &self,
        db: &DatabaseTransaction,
        ctx: &ActionContext<'_>,
    ) -> Result<(), HandlerError> {
        let stake = Self::build_stake(ctx)?;
        validator_stake_repository::upsert_stake(db, &stake).await?;
        Ok(())
    }
}
