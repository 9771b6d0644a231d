mod error;
mod routes;
mod server;

pub use error::ApiError;
pub use routes::{create_router, AppState};
pub use server::start_server;
