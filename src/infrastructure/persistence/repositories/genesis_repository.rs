use std::time::Duration;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, NotSet, QueryOrder, Set,
};
use serde_json::Value;

use crate::infrastructure::persistence::entities::genesis_data;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::timeout::bounded;

/// Replace the stored genesis document with `data`
pub async fn replace_genesis<C: ConnectionTrait>(db: &C, data: Value) -> Result<(), DbError> {
    genesis_data::Entity::delete_many().exec(db).await?;

    genesis_data::ActiveModel {
        id: NotSet,
        data: Set(data),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    Ok(())
}

/// Repository for the stored genesis document
#[derive(Debug, Clone)]
pub struct GenesisRepository {
    conn: DatabaseConnection,
    timeout: Duration,
}

impl GenesisRepository {
    pub fn new(conn: DatabaseConnection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }

    /// Most recently stored genesis document
    pub async fn latest(&self) -> Result<Option<Value>, DbError> {
        let row = bounded(
            "latest_genesis",
            self.timeout,
            genesis_data::Entity::find()
                .order_by_desc(genesis_data::Column::Id)
                .one(&self.conn),
        )
        .await?;
        Ok(row.map(|r| r.data))
    }
}
