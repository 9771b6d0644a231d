//! Chain liveness monitoring and the incident ledger.

mod liveness;
mod monitor;
mod scheduler;

pub use liveness::{incident_description, LivenessProbe, LivenessReport, BLOCKCHAIN_SERVICE};
pub use monitor::{HealthMonitor, ROLLUP_DAYS};
pub use scheduler::HealthScheduler;
