//! Hello endpoint
//!
//! GET / and GET /api/

use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const HELLO_MESSAGE: &str = "Hello World from Dockerized App!";

#[derive(Debug, Serialize, Deserialize)]
pub struct HelloResponse {
    pub message: String,
}

pub async fn hello() -> Json<HelloResponse> {
    debug!("Serving hello message");

    Json(HelloResponse {
        message: HELLO_MESSAGE.to_string(),
    })
}
