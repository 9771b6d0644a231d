mod common;

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use common::*;
use vm_subscriber::application::{HealthMonitor, IngestionPipeline};
use vm_subscriber::config::HealthConfig;
use vm_subscriber::domain::models::HealthState;
use vm_subscriber::domain::services::JsonDecoderFactory;
use vm_subscriber::infrastructure::persistence::{RepositoryFactory, Repositories};

struct Harness {
    pipeline: IngestionPipeline,
    repos: Repositories,
    monitor: HealthMonitor,
}

async fn harness() -> Harness {
    let pool = setup_pool().await;
    let repos = RepositoryFactory::create_repositories(&pool);
    let pipeline = IngestionPipeline::from_pool(&pool, Arc::new(JsonDecoderFactory));
    pipeline.initialize(GENESIS).await.unwrap();
    let monitor = HealthMonitor::new(&repos, &HealthConfig::default());
    Harness {
        pipeline,
        repos,
        monitor,
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

async fn produce_block(h: &Harness, height: u64, at: DateTime<Utc>) {
    let block = block_at(
        height,
        at.timestamp_millis(),
        vec![tx(&format!("tx-{}", height), "0xA", vec![transfer("0xB", 1)])],
        vec![success(1, vec![])],
    );
    h.pipeline.ingest(&block).await.unwrap();
}

#[tokio::test]
async fn test_empty_store_is_unreachable() {
    let h = harness().await;

    let status = h.monitor.tick_at(t0()).await;
    assert_eq!(status.state, HealthState::Red);
    assert_eq!(status.details.get("blockchain"), Some(&false));
    assert!(status.service_statuses["blockchain"].last_error.is_some());

    let incident = status.current_incident.expect("incident opened");
    assert!(incident.is_open());
    assert_eq!(incident.service_names, vec!["blockchain".to_string()]);
    assert!(incident.description.starts_with("CRITICAL"));
}

#[tokio::test]
async fn test_fresh_block_is_green() {
    let h = harness().await;
    produce_block(&h, 2, t0() - Duration::seconds(12)).await;
    produce_block(&h, 3, t0() - Duration::seconds(6)).await;
    produce_block(&h, 4, t0() - Duration::seconds(3)).await;

    let status = h.monitor.tick_at(t0()).await;
    assert_eq!(status.state, HealthState::Green);
    assert!(status.current_incident.is_none());
    assert!(status.blockchain_stats.consensus_active);
    assert_eq!(status.blockchain_stats.last_block_height, 4);
    assert_eq!(status.blockchain_stats.last_block_hash, "block-4");
    assert_eq!(status.blockchain_stats.recent_block_count, 3);
    assert_eq!(status.blockchain_stats.recent_tx_count, 3);
    assert!((status.blockchain_stats.avg_block_time_secs - 4.5).abs() < 1e-9);

    assert!(h.monitor.incident_history(10).await.unwrap().is_empty());
    assert_eq!(h.monitor.get_status().await, status);
}

#[tokio::test]
async fn test_stale_block_is_red() {
    let h = harness().await;
    produce_block(&h, 2, t0() - Duration::seconds(13)).await;

    let status = h.monitor.tick_at(t0()).await;
    assert_eq!(status.state, HealthState::Red);
    assert!(!status.blockchain_stats.consensus_active);
    assert_eq!(status.blockchain_stats.last_block_height, 2);

    let description = status.current_incident.unwrap().description;
    assert!(description.contains("Last Block Height: 2"));
    assert!(description.contains("Block Age: 13s"));
}

#[tokio::test]
async fn test_unreachable_ticks_share_one_incident() {
    let h = harness().await;
    produce_block(&h, 2, t0()).await;

    let first = h.monitor.tick_at(t0() + Duration::seconds(30)).await;
    let second = h.monitor.tick_at(t0() + Duration::seconds(36)).await;
    let third = h.monitor.tick_at(t0() + Duration::seconds(42)).await;
    assert_eq!(third.state, HealthState::Red);

    let id = first.current_incident.unwrap().id;
    assert_eq!(second.current_incident.unwrap().id, id);
    assert_eq!(third.current_incident.unwrap().id, id);

    let history = h.monitor.incident_history(10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].is_open());

    produce_block(&h, 3, t0() + Duration::seconds(60)).await;
    let recovered = h.monitor.tick_at(t0() + Duration::seconds(61)).await;
    assert_eq!(recovered.state, HealthState::Green);
    assert!(recovered.current_incident.is_none());

    let history = h.monitor.incident_history(10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, id);
    assert_eq!(history[0].end_time, Some(t0() + Duration::seconds(61)));
    assert_eq!(history[0].duration, Some(31));

    // Further green ticks write nothing new
    h.monitor.tick_at(t0() + Duration::seconds(62)).await;
    assert_eq!(h.monitor.incident_history(10).await.unwrap(), history);
}

#[tokio::test]
async fn test_elapsed_debounce_supersedes_incident() {
    let h = harness().await;

    let first = h.monitor.tick_at(t0()).await.current_incident.unwrap();
    let later = t0() + Duration::seconds(3_601);
    let second = h.monitor.tick_at(later).await.current_incident.unwrap();
    assert_ne!(first.id, second.id);

    let history = h.monitor.incident_history(10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, second.id);
    assert!(history[0].is_open());
    assert_eq!(history[1].id, first.id);
    assert_eq!(history[1].end_time, Some(later));
}

#[tokio::test]
async fn test_daily_rollup_never_improves_within_a_day() {
    let h = harness().await;
    let day = t0().date_naive();

    h.monitor.tick_at(t0()).await;
    produce_block(&h, 2, t0() + Duration::seconds(600)).await;
    let status = h.monitor.tick_at(t0() + Duration::seconds(601)).await;
    assert_eq!(status.state, HealthState::Green);

    let summaries = h.repos.daily_summary.since(day.pred_opt().unwrap()).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].date, day);
    assert_eq!(summaries[0].state, HealthState::Red);
    assert_eq!(summaries[0].incidents.len(), 1);
    assert!(summaries[0].incidents[0].starts_with("CRITICAL"));

    // The next day starts from the current state again
    let next_day = t0() + Duration::days(1);
    produce_block(&h, 3, next_day).await;
    h.monitor.tick_at(next_day + Duration::seconds(1)).await;
    let summaries = h.repos.daily_summary.since(day.pred_opt().unwrap()).await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].state, HealthState::Green);
    assert!(summaries[0].incidents.is_empty());
}

#[tokio::test]
async fn test_rollup_covers_recent_days() {
    let h = harness().await;
    let now = Utc::now();

    h.monitor.tick_at(now).await;
    h.monitor.tick_at(now - Duration::days(120)).await;

    let rollup = h.monitor.rollup_90_days().await.unwrap();
    assert_eq!(rollup.len(), 1);
    assert_eq!(rollup[0].date, now.date_naive());
    assert_eq!(rollup[0].state, HealthState::Red);
}

#[tokio::test]
async fn test_resume_adopts_open_incident() {
    let h = harness().await;
    let opened = h
        .repos
        .health_event
        .insert_incident(HealthState::Red, "left over", &["blockchain".to_string()], t0())
        .await
        .unwrap();

    let restarted = HealthMonitor::new(&h.repos, &HealthConfig::default());
    let resumed = restarted.resume().await.unwrap().unwrap();
    assert_eq!(resumed.id, opened.id);

    let status = restarted.get_status().await;
    assert_eq!(status.state, HealthState::Red);
    assert_eq!(status.current_incident.map(|i| i.id), Some(opened.id));

    produce_block(&h, 2, t0() + Duration::seconds(100)).await;
    restarted.tick_at(t0() + Duration::seconds(101)).await;

    let history = restarted.incident_history(10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].duration, Some(101));
}
