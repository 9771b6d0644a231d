use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::DatabaseConfig;
use crate::infrastructure::persistence::error::DbError;
use crate::utils::logging;

/// Manages database connection pool
pub struct DbPool {
    connection: DatabaseConnection,
    store_timeout: Duration,
}

impl DbPool {
    /// Creates a new database connection pool
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DbError> {
        logging::log_database_connection_details(&config.url);

        let conn_opts = ConnectOptions::new(config.url.clone())
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(config.store_timeout)
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(300))
            .sqlx_logging(false)
            .to_owned();

        match Database::connect(conn_opts).await {
            Ok(connection) => {
                logging::log_info("Database connection established successfully");
                Ok(DbPool {
                    connection,
                    store_timeout: config.store_timeout,
                })
            }
            Err(e) => {
                logging::log_error(&format!("Failed to connect to database: {}", e));
                Err(DbError::ConnectionError(format!(
                    "Failed to connect to database: {}",
                    e
                )))
            }
        }
    }

    /// Wraps an existing connection, used by tests and tools
    pub fn from_connection(connection: DatabaseConnection, store_timeout: Duration) -> Self {
        Self {
            connection,
            store_timeout,
        }
    }

    /// Returns the database connection
    pub fn get_connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Upper bound applied to individual store calls
    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }
}
