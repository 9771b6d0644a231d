use std::time::Duration;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder,
};

use crate::infrastructure::persistence::entities::blocks;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::timeout::bounded;

/// Insert the block row, or overwrite every column of an existing one at the same height
pub async fn upsert_block<C: ConnectionTrait>(db: &C, block: &blocks::Model) -> Result<(), DbError> {
    blocks::Entity::insert(block.clone().into_active_model())
        .on_conflict(
            OnConflict::column(blocks::Column::BlockHeight)
                .update_columns([
                    blocks::Column::BlockHash,
                    blocks::Column::ParentBlockHash,
                    blocks::Column::StateRoot,
                    blocks::Column::BlockSize,
                    blocks::Column::TxCount,
                    blocks::Column::TotalFee,
                    blocks::Column::AvgTxSize,
                    blocks::Column::UniqueParticipants,
                    blocks::Column::Timestamp,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Repository for block reads
#[derive(Clone, Debug)]
pub struct BlockRepository {
    conn: DatabaseConnection,
    timeout: Duration,
}

impl BlockRepository {
    pub fn new(conn: DatabaseConnection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }

    /// Highest stored block
    pub async fn latest(&self) -> Result<Option<blocks::Model>, DbError> {
        bounded(
            "latest_block",
            self.timeout,
            blocks::Entity::find()
                .order_by_desc(blocks::Column::BlockHeight)
                .one(&self.conn),
        )
        .await
    }

    pub async fn find_by_height(&self, height: u64) -> Result<Option<blocks::Model>, DbError> {
        bounded(
            "find_block",
            self.timeout,
            blocks::Entity::find_by_id(height as i64).one(&self.conn),
        )
        .await
    }

    /// Blocks with a timestamp strictly after `since`, highest first
    pub async fn blocks_since(&self, since: DateTime<Utc>) -> Result<Vec<blocks::Model>, DbError> {
        bounded(
            "blocks_since",
            self.timeout,
            blocks::Entity::find()
                .filter(blocks::Column::Timestamp.gt(since))
                .order_by_desc(blocks::Column::BlockHeight)
                .all(&self.conn),
        )
        .await
    }

    pub async fn all(&self) -> Result<Vec<blocks::Model>, DbError> {
        bounded(
            "all_blocks",
            self.timeout,
            blocks::Entity::find()
                .order_by_asc(blocks::Column::BlockHeight)
                .all(&self.conn),
        )
        .await
    }
}
