//! SeaORM Entity for health_events table
//! At most one open row per state, enforced by the health monitor

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "health_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(Some(10))")]
    pub state: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub service_names: Json,
    pub start_time: DateTimeUtc,
    #[sea_orm(nullable)]
    pub end_time: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub duration: Option<i64>,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
