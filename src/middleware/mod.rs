//! Middleware module
//!
//! Applies the configured middleware chain to the router. The first entry in
//! the chain ends up outermost.

pub mod hosts;
pub mod logging;

use crate::config::{settings::SecurityConfig, Middleware, Settings};
use axum::{
    http::{header, HeaderName, HeaderValue},
    middleware::from_fn_with_state,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
};
use tracing::debug;

pub use hosts::HostPolicy;

/// Wrap `router` with every middleware in `settings.framework.middleware`
///
/// Must run after all routes and the fallback are registered.
pub fn apply_chain(router: Router, settings: &Settings) -> Router {
    settings
        .framework
        .middleware
        .iter()
        .rev()
        .fold(router, |router, middleware| apply_one(router, *middleware, settings))
}

fn apply_one(router: Router, middleware: Middleware, settings: &Settings) -> Router {
    match middleware {
        Middleware::Security => router
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::REFERRER_POLICY,
                HeaderValue::from_static("same-origin"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("cross-origin-opener-policy"),
                HeaderValue::from_static("same-origin"),
            )),
        Middleware::Cors => router.layer(cors_layer(&settings.security)),
        Middleware::Common => router.layer(from_fn_with_state(
            Arc::new(HostPolicy::from_settings(settings)),
            hosts::allowed_hosts_middleware,
        )),
        Middleware::Clickjacking => router.layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        )),
        Middleware::Session | Middleware::Csrf | Middleware::Authentication | Middleware::Messages => {
            debug!("Middleware {} has no HTTP layer in this service", middleware);
            router
        }
    }
}

/// CORS policy from security settings
pub fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_allow_all_origins {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    }
}
