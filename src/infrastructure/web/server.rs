use axum::http::{header, Method};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes::{create_router, AppState};
use crate::config::AppConfig;
use crate::utils::logging;

/// Serve the HTTP surface until `shutdown` resolves
pub async fn start_server<F>(config: &AppConfig, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(Any);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    logging::log_info(&format!("Starting web server on http://{}", addr));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
