use std::future::Future;
use std::time::Duration;

use crate::infrastructure::persistence::error::DbError;

/// Run a store call, failing with `DbError::Timeout` once `timeout` elapses
pub async fn bounded<T, E, F>(operation: &'static str, timeout: Duration, fut: F) -> Result<T, DbError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<DbError>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(DbError::Timeout { operation, timeout }),
    }
}
