//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod health;
pub mod hello;

use crate::config::Settings;
use crate::middleware::{apply_chain, logging::request_logging_middleware};
use crate::services::backends::{default_checks, BackendCheck};
use crate::utils::error::AppError;
use axum::{http::Uri, middleware::from_fn, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub backends: Vec<Arc<dyn BackendCheck>>,
}

impl AppState {
    /// Per-backend probe timeout
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.probes.timeout)
    }
}

/// Create application router with Postgres and Redis readiness checks
pub fn create_router(settings: Settings) -> Router {
    let backends = default_checks(&settings);
    create_router_with_backends(settings, backends)
}

/// Create application router with explicit readiness checks
pub fn create_router_with_backends(settings: Settings, backends: Vec<Arc<dyn BackendCheck>>) -> Router {
    health::init_start_time();

    let static_path = settings.static_mount_path();
    let static_root = settings.static_files.root.clone();

    let app_state = Arc::new(AppState {
        settings: settings.clone(),
        backends,
    });

    let mut router = Router::new()
        .route("/", get(hello::hello))
        .route("/api", get(hello::hello))
        .route("/api/", get(hello::hello))
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check));

    // Static files cannot be nested at the root
    if static_path != "/" {
        router = router.nest_service(&static_path, ServeDir::new(static_root));
    }

    let router = router.fallback(not_found).with_state(app_state);

    apply_chain(router, &settings).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(from_fn(request_logging_middleware)),
    )
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
