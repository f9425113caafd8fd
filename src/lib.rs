//! hellostack
//!
//! A containerised hello-world backend: one JSON endpoint, environment-driven
//! Postgres/Redis settings, health probes and a CI smoke check.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use handlers::{create_router, create_router_with_backends, AppState};
pub use services::{run_smoke_check, BackendCheck};
pub use utils::error::{AppError, AppResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
