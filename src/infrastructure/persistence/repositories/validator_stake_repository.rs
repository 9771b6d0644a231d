use std::time::Duration;

use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder};

use crate::infrastructure::persistence::entities::validator_stake;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::timeout::bounded;

/// Insert the stake keyed by (node id, stake start), refreshing the remaining fields on conflict
pub async fn upsert_stake<C: ConnectionTrait>(
    db: &C,
    stake: &validator_stake::Model,
) -> Result<(), DbError> {
    validator_stake::Entity::insert(stake.clone().into_active_model())
        .on_conflict(
            OnConflict::columns([
                validator_stake::Column::NodeId,
                validator_stake::Column::StakeStartBlock,
            ])
            .update_columns([
                validator_stake::Column::Actor,
                validator_stake::Column::StakeEndBlock,
                validator_stake::Column::StakedAmount,
                validator_stake::Column::DelegationFeeRate,
                validator_stake::Column::RewardAddress,
                validator_stake::Column::TxHash,
                validator_stake::Column::Timestamp,
            ])
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Repository for validator stake reads
#[derive(Debug, Clone)]
pub struct ValidatorStakeRepository {
    conn: DatabaseConnection,
    timeout: Duration,
}

impl ValidatorStakeRepository {
    pub fn new(conn: DatabaseConnection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }

    pub async fn find(
        &self,
        node_id: &str,
        stake_start_block: u64,
    ) -> Result<Option<validator_stake::Model>, DbError> {
        bounded(
            "find_validator_stake",
            self.timeout,
            validator_stake::Entity::find_by_id((node_id.to_string(), stake_start_block as i64))
                .one(&self.conn),
        )
        .await
    }

    pub async fn all(&self) -> Result<Vec<validator_stake::Model>, DbError> {
        bounded(
            "all_validator_stakes",
            self.timeout,
            validator_stake::Entity::find()
                .order_by_asc(validator_stake::Column::NodeId)
                .order_by_asc(validator_stake::Column::StakeStartBlock)
                .all(&self.conn),
        )
        .await
    }
}
