use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::domain::models::{BlockchainStats, ServiceStatus};
use crate::infrastructure::persistence::entities::blocks;
use crate::infrastructure::persistence::repositories::{BlockRepository, TransactionRepository};
use crate::utils::logging;

/// Service name recorded on chain liveness incidents
pub const BLOCKCHAIN_SERVICE: &str = "blockchain";

/// Outcome of one liveness probe
#[derive(Debug, Clone, PartialEq)]
pub struct LivenessReport {
    pub service: ServiceStatus,
    pub stats: BlockchainStats,
    /// Age of the newest stored block at probe time
    pub block_age: Option<chrono::Duration>,
}

impl LivenessReport {
    pub fn is_reachable(&self) -> bool {
        self.service.is_reachable
    }
}

/// Judges chain liveness from the age of the newest stored block
#[derive(Debug, Clone)]
pub struct LivenessProbe {
    blocks: BlockRepository,
    transactions: TransactionRepository,
    stale_after: Duration,
    stats_window: Duration,
}

impl LivenessProbe {
    pub fn new(
        blocks: BlockRepository,
        transactions: TransactionRepository,
        stale_after: Duration,
        stats_window: Duration,
    ) -> Self {
        Self {
            blocks,
            transactions,
            stale_after,
            stats_window,
        }
    }

    pub async fn probe(&self, now: DateTime<Utc>) -> LivenessReport {
        let started = Instant::now();
        let mut service = ServiceStatus {
            last_checked: Some(now),
            ..Default::default()
        };
        let mut stats = BlockchainStats::default();

        let latest = match self.blocks.latest().await {
            Ok(Some(block)) => block,
            Ok(None) => {
                service.last_error = Some("Failed to query last block: no blocks stored".to_string());
                service.response_time_seconds = started.elapsed().as_secs_f64();
                return LivenessReport {
                    service,
                    stats,
                    block_age: None,
                };
            }
            Err(e) => {
                service.last_error = Some(format!("Failed to query last block: {}", e));
                service.response_time_seconds = started.elapsed().as_secs_f64();
                return LivenessReport {
                    service,
                    stats,
                    block_age: None,
                };
            }
        };

        let age = now - latest.timestamp;
        let fresh = age.to_std().map_or(true, |age| age <= self.stale_after);
        if fresh {
            service.is_reachable = true;
            service.last_successful = Some(now);
        } else {
            service.last_error = Some(format!(
                "Connection to chain lost - no new blocks in {}s",
                age.num_seconds()
            ));
        }

        stats.last_block_height = latest.block_height;
        stats.last_block_hash = latest.block_hash.clone();
        stats.last_block_time = Some(latest.timestamp);
        stats.consensus_active = fresh;
        self.fill_window_stats(now, &mut stats).await;

        service.response_time_seconds = started.elapsed().as_secs_f64();
        LivenessReport {
            service,
            stats,
            block_age: Some(age),
        }
    }

    /// Trailing window counters; failures only cost the statistics
    async fn fill_window_stats(&self, now: DateTime<Utc>, stats: &mut BlockchainStats) {
        let window = chrono::Duration::from_std(self.stats_window)
            .unwrap_or_else(|_| chrono::Duration::minutes(1));

        let recent = match self.blocks.blocks_since(now - window).await {
            Ok(recent) => recent,
            Err(e) => {
                logging::log_warning(&format!("Error counting recent blocks: {}", e));
                return;
            }
        };

        stats.recent_block_count = recent.len() as u64;
        stats.avg_block_time_secs = average_block_time(&recent);

        let hashes = recent.iter().map(|b| b.block_hash.clone()).collect();
        match self.transactions.count_in_blocks(hashes).await {
            Ok(count) => stats.recent_tx_count = count,
            Err(e) => logging::log_warning(&format!("Error counting recent transactions: {}", e)),
        }
    }
}

/// Mean seconds between consecutive blocks, 0 with fewer than two blocks
pub(crate) fn average_block_time(recent: &[blocks::Model]) -> f64 {
    let mut ordered: Vec<_> = recent.iter().collect();
    ordered.sort_by_key(|b| b.block_height);

    let gaps: Vec<f64> = ordered
        .windows(2)
        .map(|pair| (pair[1].timestamp - pair[0].timestamp).num_milliseconds() as f64 / 1000.0)
        .collect();

    if gaps.is_empty() {
        0.0
    } else {
        gaps.iter().sum::<f64>() / gaps.len() as f64
    }
}

/// Incident text for an unreachable chain
pub fn incident_description(report: &LivenessReport) -> String {
    let mut description = String::from("CRITICAL: Chain unresponsive\n");
    description.push_str(&format!(
        "- Error: {}\n",
        report.service.last_error.as_deref().unwrap_or("unknown")
    ));
    description.push_str(&format!(
        "- Last Block Height: {}\n",
        report.stats.last_block_height
    ));
    match report.stats.last_block_time {
        Some(time) => description.push_str(&format!("- Last Block Time: {}\n", time.to_rfc3339())),
        None => description.push_str("- Last Block Time: never\n"),
    }
    if let Some(age) = report.block_age {
        description.push_str(&format!("- Block Age: {}s\n", age.num_seconds()));
    }
    description
}
