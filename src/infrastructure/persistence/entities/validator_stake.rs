use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "validator_stake")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub node_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub stake_start_block: i64,
    /// Sponsor of the registering transaction
    #[sea_orm(column_type = "Text")]
    pub actor: String,
    pub stake_end_block: i64,
    pub staked_amount: i64,
    pub delegation_fee_rate: i64,
    #[sea_orm(column_type = "Text")]
    pub reward_address: String,
    #[sea_orm(column_type = "Text")]
    pub tx_hash: String,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
