// crates/backend-lib/src/handlers/mod.rs

//! HTTP route handlers.

pub mod account;

use axum::Json;
use release_common::HealthResponse;

pub use account::{auto_login, user_login, user_signup};

/// `GET /test` liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Server is now working".to_string(),
    })
}
