//! Backend reachability probes
//!
//! Each probe opens a fresh connection, runs one trivial command and drops it.
//! Nothing connects at startup, so a malformed URL only surfaces here.

use crate::config::Settings;
use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{Connection, PgConnection};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// A backing service the application depends on
#[async_trait]
pub trait BackendCheck: Send + Sync {
    /// Short backend name used in reports
    fn name(&self) -> &'static str;

    /// Connect and run a no-op command
    async fn check(&self) -> AppResult<()>;
}

/// Postgres probe: `SELECT 1`
pub struct PostgresCheck {
    url: String,
}

impl PostgresCheck {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl BackendCheck for PostgresCheck {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn check(&self) -> AppResult<()> {
        let mut conn = PgConnection::connect(&self.url).await?;
        let one = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&mut conn)
            .await?;
        conn.close().await?;

        if one != 1 {
            return Err(AppError::Internal(format!("unexpected SELECT 1 result: {}", one)));
        }
        Ok(())
    }
}

/// Redis probe: `PING`
pub struct RedisCheck {
    url: String,
}

impl RedisCheck {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl BackendCheck for RedisCheck {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn check(&self) -> AppResult<()> {
        let client = redis::Client::open(self.url.as_str())?;
        let mut con = client.get_multiplexed_async_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut con).await?;

        if pong != "PONG" {
            return Err(AppError::Internal(format!("unexpected PING reply: {}", pong)));
        }
        Ok(())
    }
}

/// Outcome of one probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendStatus {
    pub name: String,
    pub healthy: bool,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Postgres and Redis checks for the given settings
pub fn default_checks(settings: &Settings) -> Vec<Arc<dyn BackendCheck>> {
    vec![
        Arc::new(PostgresCheck::new(settings.database_url())),
        Arc::new(RedisCheck::new(settings.cache_url())),
    ]
}

/// Run one check bounded by `timeout`
pub async fn probe(check: &dyn BackendCheck, timeout: Duration) -> BackendStatus {
    let started = Instant::now();
    let result = match tokio::time::timeout(timeout, check.check()).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout(format!(
            "{} did not answer within {:?}",
            check.name(),
            timeout
        ))),
    };
    let latency_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(()) => {
            debug!("Backend {} healthy ({}ms)", check.name(), latency_ms);
            BackendStatus {
                name: check.name().to_string(),
                healthy: true,
                latency_ms,
                error: None,
            }
        }
        Err(e) => {
            warn!("Backend {} unavailable: {}", check.name(), e);
            BackendStatus {
                name: check.name().to_string(),
                healthy: false,
                latency_ms,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Run every check in order
pub async fn probe_all(checks: &[Arc<dyn BackendCheck>], timeout: Duration) -> Vec<BackendStatus> {
    let mut statuses = Vec::with_capacity(checks.len());
    for check in checks {
        statuses.push(probe(check.as_ref(), timeout).await);
    }
    statuses
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowCheck;

    #[async_trait]
    impl BackendCheck for SlowCheck {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn check(&self) -> AppResult<()> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_probe_times_out() {
        let status = probe(&SlowCheck, Duration::from_millis(20)).await;

        assert!(!status.healthy);
        assert_eq!(status.name, "slow");
        assert!(status.error.unwrap().contains("did not answer"));
    }

    #[tokio::test]
    async fn test_malformed_redis_url_fails_at_probe() {
        let status = probe(&RedisCheck::new("not a url"), Duration::from_secs(1)).await;
        assert!(!status.healthy);
    }

    #[test]
    fn test_default_checks_cover_both_backends() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        let names: Vec<_> = default_checks(&settings).iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["postgres", "redis"]);
    }
}
