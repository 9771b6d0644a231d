use std::time::Duration;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder,
};

use crate::infrastructure::persistence::entities::transactions;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::timeout::bounded;

/// Insert the transaction row keyed by hash, replacing all columns on conflict
pub async fn upsert_transaction<C: ConnectionTrait>(
    db: &C,
    transaction: &transactions::Model,
) -> Result<(), DbError> {
    transactions::Entity::insert(transaction.clone().into_active_model())
        .on_conflict(
            OnConflict::column(transactions::Column::TxHash)
                .update_columns([
                    transactions::Column::BlockHash,
                    transactions::Column::Sponsor,
                    transactions::Column::Actors,
                    transactions::Column::Receivers,
                    transactions::Column::MaxFee,
                    transactions::Column::Success,
                    transactions::Column::Fee,
                    transactions::Column::Actions,
                    transactions::Column::Timestamp,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Repository for transaction reads
#[derive(Clone, Debug)]
pub struct TransactionRepository {
    conn: DatabaseConnection,
    timeout: Duration,
}

impl TransactionRepository {
    pub fn new(conn: DatabaseConnection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }

    pub async fn get_by_hash(&self, tx_hash: &str) -> Result<Option<transactions::Model>, DbError> {
        bounded(
            "get_transaction",
            self.timeout,
            transactions::Entity::find_by_id(tx_hash.to_string()).one(&self.conn),
        )
        .await
    }

    /// Number of transactions belonging to any of the given blocks
    pub async fn count_in_blocks(&self, block_hashes: Vec<String>) -> Result<u64, DbError> {
        if block_hashes.is_empty() {
            return Ok(0);
        }
        bounded(
            "count_transactions_in_blocks",
            self.timeout,
            transactions::Entity::find()
                .filter(transactions::Column::BlockHash.is_in(block_hashes))
                .count(&self.conn),
        )
        .await
    }

    pub async fn all(&self) -> Result<Vec<transactions::Model>, DbError> {
        bounded(
            "all_transactions",
            self.timeout,
            transactions::Entity::find()
                .order_by_asc(transactions::Column::TxHash)
                .all(&self.conn),
        )
        .await
    }
}
