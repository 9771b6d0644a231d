//! Repository for the incident ledger

use std::time::Duration;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::models::{HealthEvent, HealthState};
use crate::infrastructure::persistence::entities::health_events;
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::timeout::bounded;

#[derive(Debug, Clone)]
pub struct HealthEventRepository {
    conn: DatabaseConnection,
    timeout: Duration,
}

impl HealthEventRepository {
    pub fn new(conn: DatabaseConnection, timeout: Duration) -> Self {
        Self { conn, timeout }
    }

    /// Open a new incident starting at `start_time`
    pub async fn insert_incident(
        &self,
        state: HealthState,
        description: &str,
        service_names: &[String],
        start_time: DateTime<Utc>,
    ) -> Result<HealthEvent, DbError> {
        let model = health_events::ActiveModel {
            id: NotSet,
            state: Set(state.as_str().to_string()),
            description: Set(description.to_string()),
            service_names: Set(serde_json::json!(service_names)),
            start_time: Set(start_time),
            end_time: Set(None),
            duration: Set(None),
            timestamp: Set(start_time),
        };

        let inserted = bounded("insert_incident", self.timeout, model.insert(&self.conn)).await?;
        to_domain(inserted)
    }

    /// Close an open incident, recording its duration in whole seconds.
    /// Returns false when the row was already closed.
    pub async fn close_incident(
        &self,
        incident: &HealthEvent,
        end_time: DateTime<Utc>,
    ) -> Result<bool, DbError> {
        let duration = (end_time - incident.start_time).num_seconds().max(0);

        let result = bounded(
            "close_incident",
            self.timeout,
            health_events::Entity::update_many()
                .col_expr(health_events::Column::EndTime, Expr::value(Some(end_time)))
                .col_expr(health_events::Column::Duration, Expr::value(Some(duration)))
                .filter(health_events::Column::Id.eq(incident.id))
                .filter(health_events::Column::EndTime.is_null())
                .exec(&self.conn),
        )
        .await?;

        Ok(result.rows_affected > 0)
    }

    /// Newest open incident in `state`
    pub async fn find_latest_open(&self, state: HealthState) -> Result<Option<HealthEvent>, DbError> {
        let row = bounded(
            "find_open_incident",
            self.timeout,
            health_events::Entity::find()
                .filter(health_events::Column::State.eq(state.as_str()))
                .filter(health_events::Column::EndTime.is_null())
                .order_by_desc(health_events::Column::StartTime)
                .one(&self.conn),
        )
        .await?;
        row.map(to_domain).transpose()
    }

    /// Newest open incident regardless of state
    pub async fn find_latest_open_any(&self) -> Result<Option<HealthEvent>, DbError> {
        let row = bounded(
            "find_any_open_incident",
            self.timeout,
            health_events::Entity::find()
                .filter(health_events::Column::EndTime.is_null())
                .order_by_desc(health_events::Column::StartTime)
                .one(&self.conn),
        )
        .await?;
        row.map(to_domain).transpose()
    }

    /// Incidents newest first
    pub async fn history(&self, limit: u64) -> Result<Vec<HealthEvent>, DbError> {
        let rows = bounded(
            "incident_history",
            self.timeout,
            health_events::Entity::find()
                .order_by_desc(health_events::Column::StartTime)
                .order_by_desc(health_events::Column::Id)
                .limit(limit)
                .all(&self.conn),
        )
        .await?;
        rows.into_iter().map(to_domain).collect()
    }
}

fn to_domain(model: health_events::Model) -> Result<HealthEvent, DbError> {
    let state = model
        .state
        .parse::<HealthState>()
        .map_err(DbError::QueryError)?;
    let service_names = serde_json::from_value(model.service_names)
        .map_err(|e| DbError::QueryError(format!("Invalid service_names: {}", e)))?;

    Ok(HealthEvent {
        id: model.id,
        state,
        description: model.description,
        service_names,
        start_time: model.start_time,
        end_time: model.end_time,
        duration: model.duration,
        timestamp: model.timestamp,
    })
}
