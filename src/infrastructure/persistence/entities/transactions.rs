use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub tx_hash: String,
    #[sea_orm(column_type = "Text")]
    pub block_hash: String,
    #[sea_orm(column_type = "Text")]
    pub sponsor: String,
    /// Sorted array of actor addresses
    pub actors: Json,
    /// Sorted array of receiver addresses
    pub receivers: Json,
    pub max_fee: i64,
    pub success: bool,
    pub fee: i64,
    /// Denormalized snapshot of the ordered actions
    pub actions: Json,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
