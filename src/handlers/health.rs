//! Health check handlers
//!
//! Provides application health status check endpoints

use crate::handlers::AppState;
use crate::services::backends::{probe_all, BackendStatus};
use axum::{extract::State, http::StatusCode, response::Json};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Version information
    pub version: String,
    /// Timestamp
    pub timestamp: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Backend probe results (readiness only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backends: Option<Vec<BackendStatus>>,
}

impl HealthResponse {
    fn new(status: &str, backends: Option<Vec<BackendStatus>>) -> Self {
        Self {
            status: status.to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime_seconds: get_uptime_seconds(),
            backends,
        }
    }
}

/// Basic health check
///
/// GET /health
pub async fn health_check(State(_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing health check");
    Json(HealthResponse::new("healthy", None))
}

/// Liveness check
///
/// GET /health/live
/// Does not touch external dependencies
pub async fn liveness_check(State(_state): State<Arc<AppState>>) -> Json<HealthResponse> {
    debug!("Executing liveness check");
    Json(HealthResponse::new("alive", None))
}

/// Readiness check
///
/// GET /health/ready
/// 503 unless every backend answers within the probe timeout
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    debug!("Executing readiness check");

    let statuses = probe_all(&state.backends, state.probe_timeout()).await;
    let ready = statuses.iter().all(|s| s.healthy);

    if ready {
        (StatusCode::OK, Json(HealthResponse::new("ready", Some(statuses))))
    } else {
        warn!("Service not ready");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse::new("not_ready", Some(statuses))),
        )
    }
}

/// Pin the uptime origin; called when the router is built
pub fn init_start_time() {
    Lazy::force(&START_TIME);
}

/// Get service uptime in seconds
pub fn get_uptime_seconds() -> u64 {
    START_TIME.elapsed().as_secs()
}
