//! Deployment smoke check
//!
//! Requests `GET /` on `SMOKE_BASE_URL` (default `http://localhost:8000`) and
//! exits non-zero unless the status is 200.

use anyhow::{Context, Result};
use hellostack::config::settings::LoggingConfig;
use hellostack::services::smoke::{build_client, run_smoke_check};
use hellostack::utils::logging::init_logging;
use std::time::Duration;
use tracing::{error, info};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    init_logging(&LoggingConfig {
        level: env_or("RUST_LOG", "info"),
        format: env_or("LOG_FORMAT", "text"),
    })?;

    let base_url = env_or("SMOKE_BASE_URL", DEFAULT_BASE_URL);
    let timeout: u64 = env_or("SMOKE_TIMEOUT", "10")
        .parse()
        .context("Invalid timeout in SMOKE_TIMEOUT")?;

    let client = build_client(Duration::from_secs(timeout))?;

    match run_smoke_check(&client, &base_url).await {
        Ok(report) => {
            info!("✅ {} returned {} ({:?})", report.url, report.status, report.elapsed);
            Ok(())
        }
        Err(e) => {
            error!("❌ Smoke check against {} failed: {}", base_url, e);
            Err(e.into())
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
