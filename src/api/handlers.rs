//! HTTP API handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::arbitrage::ExecutorStats;
use crate::config::AuthMethod;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Whether the bot is authenticated and looping.
    pub ready: Arc<AtomicBool>,
    /// Credential strategy in use.
    pub auth_method: Arc<tokio::sync::RwLock<Option<AuthMethod>>>,
    /// Scan cycles completed.
    pub scan_cycles: Arc<AtomicU64>,
    /// Executor stats.
    pub stats: Arc<tokio::sync::RwLock<ExecutorStats>>,
    /// Prometheus render handle, when the exporter is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(false)),
            auth_method: Arc::new(tokio::sync::RwLock::new(None)),
            scan_cycles: Arc::new(AtomicU64::new(0)),
            stats: Arc::new(tokio::sync::RwLock::new(ExecutorStats::default())),
            prometheus: None,
        }
    }

    /// Attach a Prometheus render handle.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Set ready state.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Count one completed scan cycle.
    pub fn record_scan_cycle(&self) {
        self.scan_cycles.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether the bot is ready.
    pub ready: bool,
}

/// Status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Service status.
    pub status: &'static str,
    /// Credential strategy, when known.
    pub auth_method: Option<String>,
    /// Scan cycles completed.
    pub scan_cycles: u64,
    /// Execution statistics.
    pub stats: ExecutorStats,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 if ready, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let is_ready = state.is_ready();
    let response = ReadyResponse { ready: is_ready };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Status handler - returns bot status and statistics.
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let auth_method = state.auth_method.read().await.map(|m| m.to_string());
    let stats = *state.stats.read().await;
    let status = if state.is_ready() { "running" } else { "starting" };

    Json(StatusResponse {
        status,
        auth_method,
        scan_cycles: state.scan_cycles.load(Ordering::Relaxed),
        stats,
    })
}

/// Prometheus exposition handler.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.prometheus {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics exporter not installed\n".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_state_ready_toggle() {
        let state = AppState::new();
        assert!(!state.is_ready());

        state.set_ready(true);
        assert!(state.is_ready());

        state.set_ready(false);
        assert!(!state.is_ready());
    }

    #[test]
    fn scan_cycles_accumulate() {
        let state = AppState::new();
        state.record_scan_cycle();
        state.record_scan_cycle();
        assert_eq!(state.scan_cycles.load(Ordering::Relaxed), 2);
    }
}
