// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the Release web client and the account server.
//! This module defines the JSON request and response bodies of the HTTP API.

use serde::{Deserialize, Serialize};

/// Severity tag the client uses to style an alert
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Error,
    Info,
    Warning,
    Success,
}

/// Human-readable outcome shown to the user
/// # Fields
/// * `kind` - Severity tag, serialized as `type`
/// * `message` - Text to display
/// * `time` - Optional display duration hint in milliseconds
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    #[serde(rename = "type")]
    pub kind: NoticeKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            time: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    /// Attach a display duration hint
    #[must_use]
    pub fn with_time(mut self, millis: u64) -> Self {
        self.time = Some(millis);
        self
    }
}

/// Body of `POST /user_signup`
///
/// Every field is optional on the wire so that a missing field can be
/// reported as a validation notice rather than a parse failure.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub repassword: Option<String>,
}

/// Body of `POST /user_login`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body returned by `POST /auto_login`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AutoLoginResponse {
    #[serde(rename = "loggedIn")]
    pub logged_in: bool,
    /// Present only when the auto-login was refused
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// Body returned by the liveness route
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthResponse {
    #[serde(rename = "Message")]
    pub message: String,
}
