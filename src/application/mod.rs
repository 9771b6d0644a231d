pub mod health;
pub mod ingestion;

pub use health::{HealthMonitor, HealthScheduler};
pub use ingestion::{BlockSummary, IngestionPipeline};
