// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router.
use crate::handlers::{auto_login, health, user_login, user_signup};
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the account router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/test", get(health))
        .route("/user_signup", post(user_signup))
        .route("/user_login", post(user_login))
        .route("/auto_login", post(auto_login))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
