// ============================
// crates/backend-lib/src/handlers/account.rs
// ============================
//! Signup, login and auto-login routes.
//!
//! Each route answers with a `Notice` (or `AutoLoginResponse`) and the
//! cookies the web client relies on. Denials never reveal whether the email
//! is registered.
use crate::auth::{LoginOutcome, SignupOutcome};
use crate::cookies::{logged_in_cookie, session_cookie, session_token};
use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use release_common::{AutoLoginResponse, LoginRequest, Notice, SignupRequest};
use std::sync::Arc;

const LOGIN_DENIED_MESSAGE: &str = "Invalid Login Details";
const AUTO_LOGIN_DENIED_MESSAGE: &str = "Cannot auto login. Please login or signup.";

fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))
}

/// `POST /user_signup`
pub async fn user_signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<Notice>), AppError> {
    let request = parse_body(body)?;

    match state.accounts.signup(request).await? {
        SignupOutcome::Registered { session, .. } => {
            let jar = jar
                .add(session_cookie(session.token, session.ttl))
                .add(logged_in_cookie(true, state.settings.auth.logged_in_cookie_ttl()));
            Ok((StatusCode::OK, jar, Json(Notice::success("Signup Successful"))))
        },
        SignupOutcome::Rejected(reason) => {
            Ok((StatusCode::BAD_REQUEST, jar, Json(reason.notice())))
        },
    }
}

/// `POST /user_login`
pub async fn user_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<Notice>), AppError> {
    let request = parse_body(body)?;

    match state.accounts.login(request).await? {
        LoginOutcome::LoggedIn { session, .. } => {
            let jar = jar
                .add(session_cookie(session.token, session.ttl))
                .add(logged_in_cookie(true, state.settings.auth.logged_in_cookie_ttl()));
            Ok((StatusCode::OK, jar, Json(Notice::success("Login Successful"))))
        },
        LoginOutcome::Denied(_) => Ok((
            StatusCode::UNAUTHORIZED,
            jar,
            Json(Notice::error(LOGIN_DENIED_MESSAGE)),
        )),
    }
}

/// `POST /auto_login`
///
/// Always refreshes the `loggedIn` cookie to match the outcome.
pub async fn auto_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar, Json<AutoLoginResponse>), AppError> {
    let token = session_token(&jar);
    let outcome = state.accounts.auto_login(token.as_deref()).await?;
    let granted = outcome.is_granted();

    let jar = jar.add(logged_in_cookie(
        granted,
        state.settings.auth.logged_in_cookie_ttl(),
    ));

    if granted {
        Ok((
            StatusCode::OK,
            jar,
            Json(AutoLoginResponse {
                logged_in: true,
                notice: None,
            }),
        ))
    } else {
        Ok((
            StatusCode::UNAUTHORIZED,
            jar,
            Json(AutoLoginResponse {
                logged_in: false,
                notice: Some(Notice::error(AUTO_LOGIN_DENIED_MESSAGE)),
            }),
        ))
    }
}
