use std::time::Duration;

use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder};

use crate::infrastructure::persistence::entities::assets;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::timeout::bounded;

/// Insert the asset keyed by address, replacing the copied fields on conflict
pub async fn upsert_asset<C: ConnectionTrait>(db: &C, asset: &assets::Model) -> Result<(), DbError> {
    assets::Entity::insert(asset.clone().into_active_model())
        .on_conflict(
            OnConflict::column(assets::Column::AssetAddress)
                .update_columns([
                    assets::Column::AssetTypeId,
                    assets::Column::AssetType,
                    assets::Column::AssetCreator,
                    assets::Column::TxHash,
                    assets::Column::Name,
                    assets::Column::Symbol,
                    assets::Column::Decimals,
                    assets::Column::Metadata,
                    assets::Column::MaxSupply,
                    assets::Column::MintAdmin,
                    assets::Column::PauseUnpauseAdmin,
                    assets::Column::FreezeUnfreezeAdmin,
                    assets::Column::EnableDisableKycAccountAdmin,
                    assets::Column::Timestamp,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}

/// Repository for asset reads
#[derive(Debug, Clone)]
pub struct AssetRepository {
    conn: DatabaseConnection,
    timeout: Duration,
}

impl AssetRepository {
    pub fn new(conn: DatabaseConnection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }

    pub async fn find_by_address(&self, asset_address: &str) -> Result<Option<assets::Model>, DbError> {
        bounded(
            "find_asset",
            self.timeout,
            assets::Entity::find_by_id(asset_address.to_string()).one(&self.conn),
        )
        .await
    }

    pub async fn all(&self) -> Result<Vec<assets::Model>, DbError> {
        bounded(
            "all_assets",
            self.timeout,
            assets::Entity::find()
                .order_by_asc(assets::Column::AssetAddress)
                .all(&self.conn),
        )
        .await
    }
}
