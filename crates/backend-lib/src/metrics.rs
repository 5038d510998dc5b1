// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const SIGNUP_CREATED: &str = "auth.signup.created";
pub const SIGNUP_REJECTED: &str = "auth.signup.rejected";
pub const LOGIN_GRANTED: &str = "auth.login.granted";
pub const LOGIN_DENIED: &str = "auth.login.denied";
pub const AUTO_LOGIN_GRANTED: &str = "auth.auto_login.granted";
pub const AUTO_LOGIN_DENIED: &str = "auth.auto_login.denied";
