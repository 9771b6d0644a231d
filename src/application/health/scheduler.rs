use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::monitor::HealthMonitor;
use crate::domain::models::HealthState;
use crate::utils::logging;

/// Runs `HealthMonitor::tick` on the configured period until stopped
pub struct HealthScheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl HealthScheduler {
    pub fn spawn(monitor: Arc<HealthMonitor>) -> Self {
        let (shutdown, mut stop) = watch::channel(false);
        let period = monitor.tick_interval();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last_state: Option<HealthState> = None;

            logging::log_info(&format!("[HEALTH] Monitor started, tick every {:?}", period));

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let status = monitor.tick().await;
                        if last_state != Some(status.state) {
                            logging::log_info(&format!("[HEALTH] State is now {}", status.state));
                            last_state = Some(status.state);
                        }
                    }
                    changed = stop.changed() => {
                        if changed.is_err() || *stop.borrow() {
                            break;
                        }
                    }
                }
            }

            logging::log_info("[HEALTH] Monitor stopped");
        });

        Self { shutdown, handle }
    }

    /// Signal the loop and wait for the in-flight tick to finish
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            logging::log_error(&format!("[HEALTH] Monitor task failed: {}", e));
        }
    }
}
