//! SeaORM Entity for blocks table
//! One row per height, upserted on redelivery

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blocks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub block_height: i64,
    #[sea_orm(column_type = "Text")]
    pub block_hash: String,
    #[sea_orm(column_type = "Text")]
    pub parent_block_hash: String,
    #[sea_orm(column_type = "Text")]
    pub state_root: String,
    pub block_size: i64,
    pub tx_count: i32,
    pub total_fee: i64,
    pub avg_tx_size: f64,
    pub unique_participants: i32,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
