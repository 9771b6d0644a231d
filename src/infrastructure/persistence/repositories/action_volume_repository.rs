use std::time::Duration;

use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use super::action_repository;
use crate::infrastructure::persistence::entities::action_volumes;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::timeout::bounded;

/// Recompute the total for one action type from the stored actions.
///
/// Counting rows instead of incrementing keeps the total stable when the
/// same block is delivered twice.
pub async fn refresh_volume<C: ConnectionTrait>(
    db: &C,
    action_type: u8,
    action_name: &str,
) -> Result<u64, DbError> {
    let total = action_repository::count_by_type(db, action_type).await?;

    let model = action_volumes::ActiveModel {
        action_type: Set(action_type as i16),
        action_name: Set(action_name.to_string()),
        total_count: Set(total as i64),
    };

    action_volumes::Entity::insert(model)
        .on_conflict(
            OnConflict::column(action_volumes::Column::ActionType)
                .update_columns([
                    action_volumes::Column::ActionName,
                    action_volumes::Column::TotalCount,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(total)
}

/// Repository for action volume reads
#[derive(Debug, Clone)]
pub struct ActionVolumeRepository {
    conn: DatabaseConnection,
    timeout: Duration,
}

impl ActionVolumeRepository {
    pub fn new(conn: DatabaseConnection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }

    pub async fn get(&self, action_type: u8) -> Result<Option<action_volumes::Model>, DbError> {
        bounded(
            "get_action_volume",
            self.timeout,
            action_volumes::Entity::find_by_id(action_type as i16).one(&self.conn),
        )
        .await
    }

    pub async fn all(&self) -> Result<Vec<action_volumes::Model>, DbError> {
        bounded(
            "all_action_volumes",
            self.timeout,
            action_volumes::Entity::find()
                .order_by_asc(action_volumes::Column::ActionType)
                .all(&self.conn),
        )
        .await
    }
}
