//! Asset entity for SeaORM

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub asset_address: String,
    pub asset_type_id: i16,
    pub asset_type: String,
    pub asset_creator: String,
    pub tx_hash: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub metadata: Option<String>,
    pub max_supply: Option<i64>,
    pub mint_admin: Option<String>,
    pub pause_unpause_admin: Option<String>,
    pub freeze_unfreeze_admin: Option<String>,
    pub enable_disable_kyc_account_admin: Option<String>,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
