//! Schema bootstrap from the entity definitions.
//!
//! Derived tables are rebuilt on genesis; monitoring tables and the genesis
//! document survive a genesis reset.

use sea_orm::sea_query::Table;
use sea_orm::{ConnectionTrait, DbErr, EntityName, EntityTrait, PaginatorTrait, Schema};

use crate::infrastructure::persistence::entities::prelude::*;
use crate::utils::logging;

/// Tables rebuilt from scratch when a height-1 block arrives
pub const DERIVED_TABLES: [&str; 6] = [
    "blocks",
    "transactions",
    "actions",
    "assets",
    "validator_stake",
    "action_volumes",
];

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

async fn drop_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let stmt = Table::drop().table(entity).if_exists().to_owned();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}

async fn create_derived_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_table(db, Blocks).await?;
    create_table(db, Transactions).await?;
    create_table(db, Actions).await?;
    create_table(db, Assets).await?;
    create_table(db, ValidatorStake).await?;
    create_table(db, ActionVolumes).await?;
    Ok(())
}

async fn drop_derived_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    drop_table(db, Blocks).await?;
    drop_table(db, Transactions).await?;
    drop_table(db, Actions).await?;
    drop_table(db, Assets).await?;
    drop_table(db, ValidatorStake).await?;
    drop_table(db, ActionVolumes).await?;
    Ok(())
}

/// Create every table that does not exist yet
pub async fn create_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_derived_tables(db).await?;
    create_table(db, GenesisData).await?;
    create_table(db, HealthEvents).await?;
    create_table(db, DailyHealthSummaries).await?;
    logging::log_info("Database schema created or already exists");
    Ok(())
}

/// Drop and recreate the derived tables, wiping all aggregates
pub async fn reset_derived_tables<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    drop_derived_tables(db).await?;
    create_derived_tables(db).await?;
    logging::log_info(&format!(
        "Derived tables reset: {}",
        DERIVED_TABLES.join(", ")
    ));
    Ok(())
}

/// Startup reset: derived tables plus the stored genesis document
pub async fn reset_for_startup<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    drop_derived_tables(db).await?;
    drop_table(db, GenesisData).await?;
    create_schema(db).await
}

async fn count_rows<C, E>(db: &C, entity: E) -> Result<(String, u64), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync,
{
    let name = entity.table_name().to_string();
    let count = E::find().count(db).await?;
    Ok((name, count))
}

/// Row count per table, in schema order
pub async fn table_counts<C: ConnectionTrait>(db: &C) -> Result<Vec<(String, u64)>, DbErr> {
    Ok(vec![
        count_rows(db, Blocks).await?,
        count_rows(db, Transactions).await?,
        count_rows(db, Actions).await?,
        count_rows(db, Assets).await?,
        count_rows(db, ValidatorStake).await?,
        count_rows(db, ActionVolumes).await?,
        count_rows(db, GenesisData).await?,
        count_rows(db, HealthEvents).await?,
        count_rows(db, DailyHealthSummaries).await?,
    ])
}
