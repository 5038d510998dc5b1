// ============================
// crates/backend-lib/src/cookies.rs
// ============================
//! Session cookies set by the account routes.
use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::time::Duration;

/// HttpOnly cookie carrying the signed token
pub const SESSION_COOKIE: &str = "hashtoken";

/// Script-readable flag the client uses to pick its initial view
pub const LOGGED_IN_COOKIE: &str = "loggedIn";

fn max_age(ttl: Duration) -> time::Duration {
    time::Duration::seconds(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX))
}

/// `hashtoken=<token>; Max-Age=..; Path=/; Secure; HttpOnly`
pub fn session_cookie(token: String, ttl: Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .max_age(max_age(ttl))
        .secure(true)
        .http_only(true)
        .build()
}

/// `loggedIn=<bool>; Max-Age=..; Path=/; Secure`
pub fn logged_in_cookie(logged_in: bool, ttl: Duration) -> Cookie<'static> {
    Cookie::build((LOGGED_IN_COOKIE, logged_in.to_string()))
        .path("/")
        .max_age(max_age(ttl))
        .secure(true)
        .build()
}

/// Token presented by the client, if any
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}
