use std::sync::Arc;

use anyhow::Context;

use vm_subscriber::application::{HealthMonitor, HealthScheduler, IngestionPipeline};
use vm_subscriber::config::AppConfig;
use vm_subscriber::domain::services::JsonDecoderFactory;
use vm_subscriber::infrastructure::persistence::{schema, DbPool, RepositoryFactory};
use vm_subscriber::infrastructure::web::{start_server, AppState};
use vm_subscriber::utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logger();
    logging::log_info(&format!("vm-subscriber {}", env!("CARGO_PKG_VERSION")));

    let config = AppConfig::from_env();

    let db_pool = DbPool::new(&config.database)
        .await
        .context("connecting to database")?;
    let conn = db_pool.get_connection();

    if config.database.reset_on_start {
        logging::log_warning("DB_RESET is set, dropping derived tables and genesis data");
        schema::reset_for_startup(conn)
            .await
            .context("resetting database")?;
    } else {
        schema::create_schema(conn)
            .await
            .context("creating schema")?;
    }

    let repositories = RepositoryFactory::create_repositories(&db_pool);

    let pipeline = Arc::new(IngestionPipeline::from_pool(
        &db_pool,
        Arc::new(JsonDecoderFactory),
    ));

    let monitor = Arc::new(HealthMonitor::new(&repositories, &config.health));
    if let Err(e) = monitor.resume().await {
        logging::log_error(&format!("Could not load open incidents: {}", e));
    }
    let scheduler = HealthScheduler::spawn(monitor.clone());

    let state = AppState {
        pipeline,
        monitor,
        genesis: repositories.genesis.clone(),
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            logging::log_error(&format!("Failed to listen for Ctrl+C: {}", e));
        }
        logging::log_info("Shutdown requested");
    };

    let served = start_server(&config, state, shutdown).await;
    scheduler.stop().await;
    served.context("web server failed")?;

    Ok(())
}
