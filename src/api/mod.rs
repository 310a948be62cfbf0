//! HTTP API for health checks, status, and Prometheus exposition.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
