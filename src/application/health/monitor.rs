use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::liveness::{incident_description, LivenessProbe, LivenessReport, BLOCKCHAIN_SERVICE};
use crate::config::HealthConfig;
use crate::domain::models::{DailyHealthSummary, HealthEvent, HealthState, HealthStatus};
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::repositories::{
    DailySummaryRepository, HealthEventRepository, Repositories,
};
use crate::utils::logging;

/// Days covered by the historical rollup
pub const ROLLUP_DAYS: i64 = 90;

/// Drives the Green/Red incident state machine.
///
/// The last computed status is cached behind the monitor's own lock, so
/// status reads never touch the store and never fail.
pub struct HealthMonitor {
    status: Mutex<HealthStatus>,
    probe: LivenessProbe,
    incidents: HealthEventRepository,
    daily: DailySummaryRepository,
    debounce_window: chrono::Duration,
    tick_interval: Duration,
}

impl HealthMonitor {
    pub fn new(repositories: &Repositories, config: &HealthConfig) -> Self {
        Self {
            status: Mutex::new(HealthStatus::default()),
            probe: LivenessProbe::new(
                repositories.block.clone(),
                repositories.transaction.clone(),
                config.stale_block_after,
                config.stats_window,
            ),
            incidents: repositories.health_event.clone(),
            daily: repositories.daily_summary.clone(),
            debounce_window: chrono::Duration::from_std(config.debounce_window)
                .unwrap_or_else(|_| chrono::Duration::hours(1)),
            tick_interval: config.tick_interval,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Adopt the newest open incident left behind by a previous run
    pub async fn resume(&self) -> Result<Option<HealthEvent>, DbError> {
        let mut status = self.status.lock().await;
        let open = self.incidents.find_latest_open_any().await?;
        if let Some(incident) = &open {
            logging::log_info(&format!(
                "Resuming open {} incident #{} started at {}",
                incident.state, incident.id, incident.start_time
            ));
            status.state = incident.state;
            status.current_incident = Some(incident.clone());
        }
        Ok(open)
    }

    pub async fn tick(&self) -> HealthStatus {
        self.tick_at(Utc::now()).await
    }

    /// Run one liveness check as of `now` and return the new snapshot
    pub async fn tick_at(&self, now: DateTime<Utc>) -> HealthStatus {
        let mut status = self.status.lock().await;
        let report = self.probe.probe(now).await;

        status.details = BTreeMap::from([(BLOCKCHAIN_SERVICE.to_string(), report.is_reachable())]);
        status.service_statuses =
            BTreeMap::from([(BLOCKCHAIN_SERVICE.to_string(), report.service.clone())]);
        status.blockchain_stats = report.stats.clone();

        if report.is_reachable() {
            self.resolve(&mut status, now).await;
        } else {
            self.raise(&mut status, HealthState::Red, &report, now).await;
        }

        self.record_daily(&status, now).await;
        status.clone()
    }

    /// Last computed snapshot
    pub async fn get_status(&self) -> HealthStatus {
        self.status.lock().await.clone()
    }

    /// Incidents newest first
    pub async fn incident_history(&self, limit: u64) -> Result<Vec<HealthEvent>, DbError> {
        self.incidents.history(limit).await
    }

    /// Daily summaries for the last [`ROLLUP_DAYS`] days, newest first
    pub async fn rollup_90_days(&self) -> Result<Vec<DailyHealthSummary>, DbError> {
        let since = Utc::now().date_naive() - chrono::Duration::days(ROLLUP_DAYS);
        self.daily.since(since).await
    }

    async fn raise(
        &self,
        status: &mut HealthStatus,
        state: HealthState,
        report: &LivenessReport,
        now: DateTime<Utc>,
    ) {
        status.state = state;

        if let Some(current) = &status.current_incident {
            if current.state == state && self.within_debounce(current, now) {
                return;
            }
        }

        // Anything still open in memory is superseded by the new incident
        if let Some(previous) = status.current_incident.take() {
            self.close(&previous, now).await;
        }

        match self.incidents.find_latest_open(state).await {
            Ok(Some(open)) if self.within_debounce(&open, now) => {
                status.current_incident = Some(open);
                return;
            }
            Ok(Some(stale)) => self.close(&stale, now).await,
            Ok(None) => {}
            Err(e) => logging::log_error(&format!("Failed to look up open incidents: {}", e)),
        }

        let description = incident_description(report);
        match self
            .incidents
            .insert_incident(state, &description, &[BLOCKCHAIN_SERVICE.to_string()], now)
            .await
        {
            Ok(incident) => {
                logging::log_warning(&format!(
                    "Opened {} incident #{}: {}",
                    state,
                    incident.id,
                    report.service.last_error.as_deref().unwrap_or("unknown")
                ));
                status.current_incident = Some(incident);
            }
            Err(e) => {
                logging::log_error(&format!("Failed to record incident: {}", e));
                status.current_incident = None;
            }
        }
    }

    async fn resolve(&self, status: &mut HealthStatus, now: DateTime<Utc>) {
        status.state = HealthState::Green;

        if let Some(incident) = status.current_incident.take() {
            match self.incidents.close_incident(&incident, now).await {
                Ok(_) => logging::log_info(&format!(
                    "Closed {} incident #{} after {}s",
                    incident.state,
                    incident.id,
                    (now - incident.start_time).num_seconds()
                )),
                Err(e) => {
                    // Kept so the next green tick retries the close
                    logging::log_error(&format!(
                        "Failed to close incident #{}: {}",
                        incident.id, e
                    ));
                    status.current_incident = Some(incident);
                }
            }
        }
    }

    async fn close(&self, incident: &HealthEvent, now: DateTime<Utc>) {
        match self.incidents.close_incident(incident, now).await {
            Ok(true) => logging::log_info(&format!(
                "Closed superseded {} incident #{}",
                incident.state, incident.id
            )),
            Ok(false) => {}
            Err(e) => logging::log_error(&format!(
                "Failed to close incident #{}: {}",
                incident.id, e
            )),
        }
    }

    async fn record_daily(&self, status: &HealthStatus, now: DateTime<Utc>) {
        let incident = status
            .current_incident
            .as_ref()
            .map(|i| i.description.as_str());
        if let Err(e) = self
            .daily
            .record(now.date_naive(), status.state, incident, now)
            .await
        {
            logging::log_error(&format!("Failed to update daily health summary: {}", e));
        }
    }

    fn within_debounce(&self, incident: &HealthEvent, now: DateTime<Utc>) -> bool {
        now - incident.start_time < self.debounce_window
    }
}
