use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Liveness state of the monitored chain, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Green,
    Yellow,
    Red,
}

impl HealthState {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Green => "green",
            HealthState::Yellow => "yellow",
            HealthState::Red => "red",
        }
    }

    /// The more severe of two states
    pub fn worst(self, other: HealthState) -> HealthState {
        self.max(other)
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HealthState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "green" => Ok(HealthState::Green),
            "yellow" => Ok(HealthState::Yellow),
            "red" => Ok(HealthState::Red),
            other => Err(format!("unknown health state '{}'", other)),
        }
    }
}

/// Reachability of a single monitored service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub is_reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub last_checked: Option<DateTime<Utc>>,
    pub last_successful: Option<DateTime<Utc>>,
    pub response_time_seconds: f64,
}

/// Chain statistics derived from the stored blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockchainStats {
    pub last_block_height: i64,
    pub last_block_hash: String,
    pub last_block_time: Option<DateTime<Utc>>,
    pub consensus_active: bool,
    /// Blocks stored within the trailing window
    pub recent_block_count: u64,
    /// Transactions stored within the trailing window
    pub recent_tx_count: u64,
    /// Mean seconds between consecutive blocks in the trailing window
    pub avg_block_time_secs: f64,
}

/// One incident interval in the health ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthEvent {
    pub id: i32,
    pub state: HealthState,
    pub description: String,
    pub service_names: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Seconds between start and end, set when the incident closes
    pub duration: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

impl HealthEvent {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Point-in-time snapshot returned to status callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub state: HealthState,
    pub details: BTreeMap<String, bool>,
    pub service_statuses: BTreeMap<String, ServiceStatus>,
    pub blockchain_stats: BlockchainStats,
    pub current_incident: Option<HealthEvent>,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            state: HealthState::Green,
            details: BTreeMap::new(),
            service_statuses: BTreeMap::new(),
            blockchain_stats: BlockchainStats::default(),
            current_incident: None,
        }
    }
}

/// Worst state and incidents recorded for one UTC day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyHealthSummary {
    pub date: NaiveDate,
    pub state: HealthState,
    pub incidents: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_state_ordering() {
        assert_eq!(HealthState::Green.worst(HealthState::Red), HealthState::Red);
        assert_eq!(HealthState::Red.worst(HealthState::Yellow), HealthState::Red);
        assert_eq!(HealthState::Yellow.worst(HealthState::Green), HealthState::Yellow);
        assert_eq!(HealthState::Green.worst(HealthState::Green), HealthState::Green);
    }

    #[test]
    fn test_state_parsing() {
        assert_eq!("red".parse::<HealthState>(), Ok(HealthState::Red));
        assert!("purple".parse::<HealthState>().is_err());
        assert_eq!(HealthState::Yellow.to_string(), "yellow");
    }
}
