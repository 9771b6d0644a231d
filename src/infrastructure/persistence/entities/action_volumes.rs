use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "action_volumes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub action_type: i16,
    #[sea_orm(column_type = "Text")]
    pub action_name: String,
    pub total_count: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
