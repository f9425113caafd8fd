//! Smoke check client
//!
//! Issues `GET /` against a running deployment and expects 200. The body is
//! not inspected.

use crate::utils::error::{AppError, AppResult};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::{Duration, Instant};
use tracing::info;

/// Result of a passing smoke check
#[derive(Debug, Clone)]
pub struct SmokeReport {
    pub url: String,
    pub status: u16,
    pub elapsed: Duration,
}

/// Build the client used by the smoke binary
///
/// Redirects are not followed: the status checked is the one `GET /` answers.
pub fn build_client(timeout: Duration) -> AppResult<Client> {
    Ok(Client::builder()
        .timeout(timeout)
        .redirect(Policy::none())
        .build()?)
}

/// Request the root path of `base_url` once and check the status
pub async fn run_smoke_check(client: &Client, base_url: &str) -> AppResult<SmokeReport> {
    let url = format!("{}/", base_url.trim_end_matches('/'));
    let started = Instant::now();

    let response = client.get(&url).send().await?;
    let status = response.status();
    let elapsed = started.elapsed();

    if status != StatusCode::OK {
        return Err(AppError::SmokeCheck {
            expected: StatusCode::OK.as_u16(),
            actual: status.as_u16(),
        });
    }

    info!("Smoke check passed: GET {} -> {} in {:?}", url, status, elapsed);

    Ok(SmokeReport {
        url,
        status: status.as_u16(),
        elapsed,
    })
}
