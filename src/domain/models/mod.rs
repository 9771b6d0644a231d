pub mod block;
pub mod health;

pub use block::{Action, ExecutedBlock, ExecutionResult, Transaction};
pub use health::{
    BlockchainStats, DailyHealthSummary, HealthEvent, HealthState, HealthStatus, ServiceStatus,
};
