pub mod action_repository;
pub mod action_volume_repository;
pub mod asset_repository;
pub mod block_repository;
pub mod daily_summary_repository;
pub mod genesis_repository;
pub mod health_event_repository;
pub mod transaction_repository;
pub mod validator_stake_repository;

pub use action_repository::ActionRepository;
pub use action_volume_repository::ActionVolumeRepository;
pub use asset_repository::AssetRepository;
pub use block_repository::BlockRepository;
pub use daily_summary_repository::DailySummaryRepository;
pub use genesis_repository::GenesisRepository;
pub use health_event_repository::HealthEventRepository;
pub use transaction_repository::TransactionRepository;
pub use validator_stake_repository::ValidatorStakeRepository;

/// Collection of all repositories
#[derive(Clone, Debug)]
pub struct Repositories {
    pub action: ActionRepository,
    pub action_volume: ActionVolumeRepository,
    pub asset: AssetRepository,
    pub block: BlockRepository,
    pub daily_summary: DailySummaryRepository,
    pub genesis: GenesisRepository,
    pub health_event: HealthEventRepository,
    pub transaction: TransactionRepository,
    pub validator_stake: ValidatorStakeRepository,
}
