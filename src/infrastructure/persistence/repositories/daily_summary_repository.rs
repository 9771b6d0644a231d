use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::models::{DailyHealthSummary, HealthState};
use crate::infrastructure::persistence::entities::daily_health_summaries;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::timeout::bounded;

/// Repository for per-day health rollups
#[derive(Debug, Clone)]
pub struct DailySummaryRepository {
    conn: DatabaseConnection,
    timeout: Duration,
}

impl DailySummaryRepository {
    pub fn new(conn: DatabaseConnection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }

    /// Fold the current state into the rollup for `date`.
    ///
    /// The stored state only ever moves towards red within a day. The
    /// incident list is replaced only when `incident` is present.
    pub async fn record(
        &self,
        date: NaiveDate,
        state: HealthState,
        incident: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<DailyHealthSummary, DbError> {
        let incident = incident.map(str::to_string);
        bounded("record_daily_summary", self.timeout, async move {
            let txn = self.conn.begin().await?;

            let existing = daily_health_summaries::Entity::find_by_id(date)
                .one(&txn)
                .await?;

            let (stored_state, stored_incidents) = match existing {
                Some(row) => {
                    let stored = row
                        .state
                        .parse::<HealthState>()
                        .map_err(DbError::QueryError)?;
                    let incidents: Vec<String> =
                        serde_json::from_value(row.incidents).unwrap_or_default();
                    (Some(stored), incidents)
                }
                None => (None, Vec::new()),
            };

            let merged_state = stored_state.map_or(state, |s| s.worst(state));
            let incidents = match incident {
                Some(description) => vec![description],
                None => stored_incidents,
            };

            let model = daily_health_summaries::ActiveModel {
                date: Set(date),
                state: Set(merged_state.as_str().to_string()),
                incidents: Set(serde_json::json!(incidents)),
                last_updated: Set(now),
            };

            daily_health_summaries::Entity::insert(model)
                .on_conflict(
                    OnConflict::column(daily_health_summaries::Column::Date)
                        .update_columns([
                            daily_health_summaries::Column::State,
                            daily_health_summaries::Column::Incidents,
                            daily_health_summaries::Column::LastUpdated,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;

            txn.commit().await?;

            Ok::<_, DbError>(DailyHealthSummary {
                date,
                state: merged_state,
                incidents,
                last_updated: now,
            })
        })
        .await
    }

    /// Rollups dated after `since`, newest first
    pub async fn since(&self, since: NaiveDate) -> Result<Vec<DailyHealthSummary>, DbError> {
        let rows = bounded(
            "daily_summaries_since",
            self.timeout,
            daily_health_summaries::Entity::find()
                .filter(daily_health_summaries::Column::Date.gt(since))
                .order_by_desc(daily_health_summaries::Column::Date)
                .all(&self.conn),
        )
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(DailyHealthSummary {
                    date: row.date,
                    state: row.state.parse().map_err(DbError::QueryError)?,
                    incidents: serde_json::from_value(row.incidents).unwrap_or_default(),
                    last_updated: row.last_updated,
                })
            })
            .collect()
    }
}
