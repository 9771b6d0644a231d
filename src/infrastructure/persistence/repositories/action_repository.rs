use std::time::Duration;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use crate::infrastructure::persistence::entities::actions;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::timeout::bounded;

/// Insert the action keyed by (tx hash, type, index), updating it in place on redelivery
pub async fn upsert_action<C: ConnectionTrait>(db: &C, action: &actions::Model) -> Result<(), DbError> {
    actions::Entity::insert(action.clone().into_active_model())
        .on_conflict(
            OnConflict::columns([
                actions::Column::TxHash,
                actions::Column::ActionType,
                actions::Column::ActionIndex,
            ])
            .update_columns([
                actions::Column::ActionName,
                actions::Column::Input,
                actions::Column::Output,
                actions::Column::Timestamp,
            ])
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Number of stored actions of one type
pub async fn count_by_type<C: ConnectionTrait>(db: &C, action_type: u8) -> Result<u64, DbError> {
    let count = actions::Entity::find()
        .filter(actions::Column::ActionType.eq(action_type as i16))
        .count(db)
        .await?;
    Ok(count)
}

/// Repository for action reads
#[derive(Clone, Debug)]
pub struct ActionRepository {
    conn: DatabaseConnection,
    timeout: Duration,
}

impl ActionRepository {
    pub fn new(conn: DatabaseConnection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }

    /// Actions of one transaction in document order
    pub async fn find_by_tx(&self, tx_hash: &str) -> Result<Vec<actions::Model>, DbError> {
        bounded(
            "find_actions_by_tx",
            self.timeout,
            actions::Entity::find()
                .filter(actions::Column::TxHash.eq(tx_hash))
                .order_by_asc(actions::Column::ActionIndex)
                .all(&self.conn),
        )
        .await
    }

    pub async fn all(&self) -> Result<Vec<actions::Model>, DbError> {
        bounded(
            "all_actions",
            self.timeout,
            actions::Entity::find()
                .order_by_asc(actions::Column::TxHash)
                .order_by_asc(actions::Column::ActionIndex)
                .all(&self.conn),
        )
        .await
    }
}
