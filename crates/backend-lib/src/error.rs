// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
//!
//! `AppError` only carries infrastructure and request-shape failures.
//! Authentication denials and signup rejections are ordinary outcomes and
//! never travel through this type.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use release_common::Notice;
use thiserror::Error;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Credential store error: {0}")]
    Store(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Token signing error: {0}")]
    Token(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateEmail(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Store(_) => "STORE_001",
            AppError::Hashing(_) => "HASH_001",
            AppError::Token(_) => "TOKEN_001",
            AppError::Config(_) => "CONF_001",
            AppError::DuplicateEmail(_) => "STORE_002",
            AppError::InvalidInput(_) => "VAL_001",
            AppError::Internal(_) => "INT_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Whether this error comes from a dependency rather than the request
    pub fn is_infrastructure(&self) -> bool {
        !matches!(self, AppError::InvalidInput(_) | AppError::DuplicateEmail(_))
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::InvalidInput(_) => "Invalid request format".to_string(),
            AppError::DuplicateEmail(_) => "Email already exists. Please login.".to_string(),
            _ => "Internal Server Error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if self.is_infrastructure() {
            tracing::error!(code = error_code, error = %self, "request failed");
        }

        // Infrastructure details never leave the process in release builds
        let message = if cfg!(debug_assertions) && !self.is_infrastructure() {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let notice = Notice::error(message);
        let body = serde_json::json!({
            "type": notice.kind,
            "message": notice.message,
            "code": error_code,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("background task failed: {err}"))
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::Store("operation timed out".to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
