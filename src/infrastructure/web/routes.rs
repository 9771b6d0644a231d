// HTTP routes for the subscriber

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiError;
use crate::application::{BlockSummary, HealthMonitor, IngestionPipeline};
use crate::domain::models::{DailyHealthSummary, HealthEvent, HealthStatus};
use crate::infrastructure::persistence::repositories::GenesisRepository;

const DEFAULT_INCIDENT_LIMIT: u64 = 50;
const MAX_INCIDENT_LIMIT: u64 = 500;

/// Application state shared with all routes
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<IngestionPipeline>,
    pub monitor: Arc<HealthMonitor>,
    pub genesis: GenesisRepository,
}

#[derive(Debug, Deserialize)]
pub struct IncidentQuery {
    pub limit: Option<u64>,
}

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_status))
        .route("/health/incidents", get(incident_history))
        .route("/health/daily", get(daily_rollup))
        .route("/genesis", get(genesis))
        .route("/initialize", post(initialize))
        .route("/blocks", post(ingest_block))
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "VM Subscriber",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/health",
            "/health/incidents",
            "/health/daily",
            "/genesis",
            "/initialize",
            "/blocks",
        ]
    }))
}

/// Cached snapshot from the last tick; never fails
async fn health_status(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.monitor.get_status().await)
}

async fn incident_history(
    State(state): State<AppState>,
    Query(query): Query<IncidentQuery>,
) -> Result<Json<Vec<HealthEvent>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_INCIDENT_LIMIT)
        .clamp(1, MAX_INCIDENT_LIMIT);
    Ok(Json(state.monitor.incident_history(limit).await?))
}

async fn daily_rollup(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailyHealthSummary>>, ApiError> {
    Ok(Json(state.monitor.rollup_90_days().await?))
}

async fn genesis(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .genesis
        .latest()
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no genesis data stored".to_string()))
}

async fn initialize(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::InvalidRequest("empty genesis body".to_string()));
    }
    state.pipeline.initialize(&body).await?;
    Ok(Json(json!({ "status": "initialized" })))
}

async fn ingest_block(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<BlockSummary>, ApiError> {
    Ok(Json(state.pipeline.ingest_raw(&body).await?))
}
