use crate::infrastructure::persistence::connection::DbPool;
use crate::infrastructure::persistence::repositories::{
    ActionRepository, ActionVolumeRepository, AssetRepository, BlockRepository,
    DailySummaryRepository, GenesisRepository, HealthEventRepository, Repositories,
    TransactionRepository, ValidatorStakeRepository,
};

/// Factory for creating repositories
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create all repositories sharing the pool's connection and store timeout
    pub fn create_repositories(db_pool: &DbPool) -> Repositories {
        let conn = db_pool.get_connection().clone();
        let timeout = db_pool.store_timeout();

        Repositories {
            action: ActionRepository::new(conn.clone(), timeout),
            action_volume: ActionVolumeRepository::new(conn.clone(), timeout),
            asset: AssetRepository::new(conn.clone(), timeout),
            block: BlockRepository::new(conn.clone(), timeout),
            daily_summary: DailySummaryRepository::new(conn.clone(), timeout),
            genesis: GenesisRepository::new(conn.clone(), timeout),
            health_event: HealthEventRepository::new(conn.clone(), timeout),
            transaction: TransactionRepository::new(conn.clone(), timeout),
            validator_stake: ValidatorStakeRepository::new(conn, timeout),
        }
    }
}
