#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database};
use serde_json::{json, Value};

use vm_subscriber::application::IngestionPipeline;
use vm_subscriber::domain::models::{Action, ExecutedBlock, ExecutionResult, Transaction};
use vm_subscriber::domain::services::JsonDecoderFactory;
use vm_subscriber::infrastructure::persistence::{schema, DbPool, RepositoryFactory, Repositories};
use vm_subscriber::utils::logging;

pub const GENESIS: &[u8] = br#"{"chain_id":"test-chain","network_id":1337,"min_fee":1}"#;
/// Unix millis used as the base block time in tests
pub const BASE_TIME_MS: i64 = 1_700_000_000_000;

/// In-memory store with the full schema
pub async fn setup_pool() -> DbPool {
    logging::init_test_logger();
    // A single connection keeps every query on the same in-memory database
    let options = ConnectOptions::new("sqlite::memory:".to_string())
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false)
        .to_owned();
    let conn = Database::connect(options)
        .await
        .expect("sqlite connection");
    schema::create_schema(&conn).await.expect("schema bootstrap");
    DbPool::from_connection(conn, Duration::from_secs(5))
}

pub async fn setup() -> (IngestionPipeline, Repositories) {
    let pool = setup_pool().await;
    let pipeline = IngestionPipeline::from_pool(&pool, Arc::new(JsonDecoderFactory));
    let repositories = RepositoryFactory::create_repositories(&pool);
    (pipeline, repositories)
}

pub async fn setup_initialized() -> (IngestionPipeline, Repositories) {
    let (pipeline, repositories) = setup().await;
    pipeline.initialize(GENESIS).await.expect("initialize");
    (pipeline, repositories)
}

pub fn action(type_id: u8, input: Value) -> Action {
    Action { type_id, input }
}

pub fn transfer(to: &str, amount: u64) -> Action {
    action(0, json!({ "to": to, "value": amount }))
}

pub fn tx(tx_hash: &str, sponsor: &str, actions: Vec<Action>) -> Transaction {
    Transaction {
        tx_hash: tx_hash.to_string(),
        sponsor: sponsor.to_string(),
        actions,
        max_fee: 100,
    }
}

pub fn output(value: Value) -> Vec<u8> {
    serde_json::to_vec(&value).expect("serializable output")
}

pub fn success(fee: u64, outputs: Vec<Vec<u8>>) -> ExecutionResult {
    ExecutionResult {
        success: true,
        fee,
        outputs,
    }
}

pub fn failure(fee: u64) -> ExecutionResult {
    ExecutionResult {
        success: false,
        fee,
        outputs: Vec::new(),
    }
}

pub fn block(
    height: u64,
    transactions: Vec<Transaction>,
    results: Vec<ExecutionResult>,
) -> ExecutedBlock {
    block_at(height, BASE_TIME_MS + height as i64 * 6_000, transactions, results)
}

pub fn block_at(
    height: u64,
    timestamp_ms: i64,
    transactions: Vec<Transaction>,
    results: Vec<ExecutionResult>,
) -> ExecutedBlock {
    ExecutedBlock {
        height,
        block_hash: format!("block-{}", height),
        parent_hash: format!("block-{}", height.saturating_sub(1)),
        state_root: format!("root-{}", height),
        timestamp_ms,
        size: 1_000,
        transactions,
        results,
    }
}
