pub use super::action_volumes::Entity as ActionVolumes;
pub use super::actions::Entity as Actions;
pub use super::assets::Entity as Assets;
pub use super::blocks::Entity as Blocks;
pub use super::daily_health_summaries::Entity as DailyHealthSummaries;
pub use super::genesis_data::Entity as GenesisData;
pub use super::health_events::Entity as HealthEvents;
pub use super::transactions::Entity as Transactions;
pub use super::validator_stake::Entity as ValidatorStake;
