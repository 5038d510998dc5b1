use super::authenticator::{AuthOutcome, AuthRequest, Authenticator, DenyReason};
use super::password::{check_strength, CredentialHasher};
use super::service::{AccountService, IssuedToken, LoginOutcome, SignupOutcome, SignupRejection};
use super::token::TokenService;
use crate::config::Settings;
use crate::error::AppError;
use crate::metrics as keys;
use crate::storage::{UserPatch, UserRecord, UserStore};
use async_trait::async_trait;
use metrics::counter;
use release_common::{LoginRequest, SignupRequest};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use zeroize::Zeroizing;

/// Token lifetimes per flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub signup_ttl: Duration,
    pub login_ttl: Duration,
}

impl SessionPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            signup_ttl: settings.auth.signup_token_ttl(),
            login_ttl: settings.auth.login_token_ttl(),
        }
    }
}

pub struct DefaultAccounts {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<TokenService>,
    authenticator: Authenticator,
    policy: SessionPolicy,
    store_timeout: Duration,
}

impl DefaultAccounts {
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<TokenService>,
        policy: SessionPolicy,
        store_timeout: Duration,
    ) -> Self {
        let authenticator =
            Authenticator::new(store.clone(), hasher.clone(), tokens.clone(), store_timeout);
        Self {
            store,
            hasher,
            tokens,
            authenticator,
            policy,
            store_timeout,
        }
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, AppError>>,
    ) -> Result<T, AppError> {
        tokio::time::timeout(self.store_timeout, call).await?
    }

    fn reject(&self, reason: SignupRejection) -> Result<SignupOutcome, AppError> {
        counter!(keys::SIGNUP_REJECTED).increment(1);
        tracing::debug!(?reason, "signup rejected");
        Ok(SignupOutcome::Rejected(reason))
    }
}

/// Treat absent and empty fields alike
fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

#[async_trait]
impl AccountService for DefaultAccounts {
    async fn signup(&self, request: SignupRequest) -> Result<SignupOutcome, AppError> {
        let (Some(email), Some(password), Some(repassword)) = (
            present(request.email),
            present(request.password).map(Zeroizing::new),
            present(request.repassword).map(Zeroizing::new),
        ) else {
            return self.reject(SignupRejection::MissingFields);
        };

        if self.bounded(self.store.exists(&email)).await? {
            return self.reject(SignupRejection::EmailTaken);
        }
        if *password != *repassword {
            return self.reject(SignupRejection::PasswordMismatch);
        }
        if !check_strength(&password) {
            return self.reject(SignupRejection::WeakPassword);
        }

        let password_hash = self.hasher.hash(&password).await?;
        let token = self.tokens.issue(&email, self.policy.signup_ttl)?;

        let record = UserRecord {
            email: email.clone(),
            password_hash,
            session_token: Some(token.clone()),
        };
        match self.bounded(self.store.insert(record)).await {
            Ok(()) => {},
            // Lost a race with a concurrent signup for the same email
            Err(AppError::DuplicateEmail(_)) => return self.reject(SignupRejection::EmailTaken),
            Err(e) => return Err(e),
        }

        counter!(keys::SIGNUP_CREATED).increment(1);
        tracing::info!(%email, "account created");

        Ok(SignupOutcome::Registered {
            email,
            session: IssuedToken {
                token,
                ttl: self.policy.signup_ttl,
            },
        })
    }

    async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AppError> {
        let email = request.email.unwrap_or_default();
        let password = Zeroizing::new(request.password.unwrap_or_default());

        let outcome = self
            .authenticator
            .authenticate(AuthRequest::Credentials {
                email: email.clone(),
                password: password.to_string(),
            })
            .await?;

        let email = match outcome {
            AuthOutcome::Granted { email } => email,
            AuthOutcome::Denied(reason) => {
                counter!(keys::LOGIN_DENIED).increment(1);
                tracing::info!(%email, ?reason, "login denied");
                return Ok(LoginOutcome::Denied(reason));
            },
        };

        let token = self.tokens.issue(&email, self.policy.login_ttl)?;

        // Concurrent logins race here; the last write wins
        let updated = self
            .bounded(self.store.update(&email, UserPatch::session_token(token.clone())))
            .await?;
        if !updated {
            counter!(keys::LOGIN_DENIED).increment(1);
            tracing::info!(%email, "account vanished during login");
            return Ok(LoginOutcome::Denied(DenyReason::UnknownAccount));
        }

        counter!(keys::LOGIN_GRANTED).increment(1);
        tracing::info!(%email, "login granted");

        Ok(LoginOutcome::LoggedIn {
            email,
            session: IssuedToken {
                token,
                ttl: self.policy.login_ttl,
            },
        })
    }

    async fn auto_login(&self, token: Option<&str>) -> Result<AuthOutcome, AppError> {
        let outcome = match token {
            Some(token) => {
                self.authenticator
                    .authenticate(AuthRequest::Token(token.to_string()))
                    .await?
            },
            None => AuthOutcome::Denied(DenyReason::MissingCredentials),
        };

        match &outcome {
            AuthOutcome::Granted { email } => {
                counter!(keys::AUTO_LOGIN_GRANTED).increment(1);
                tracing::debug!(%email, "auto-login granted");
            },
            AuthOutcome::Denied(reason) => {
                counter!(keys::AUTO_LOGIN_DENIED).increment(1);
                tracing::debug!(?reason, "auto-login denied");
            },
        }

        Ok(outcome)
    }
}
