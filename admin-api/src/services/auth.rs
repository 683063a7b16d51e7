use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;
use uuid::Uuid;

use ecom_database::UserStore;
use ecom_models::auth::{RegisterRequest, ResetPasswordLink, User};

use super::notify::Notifier;
use super::otp::OtpGenerator;
use super::token::TokenIssuer;

/// Internal reason a login was refused. The HTTP adapter collapses all of
/// these into one generic bad-request body so callers cannot probe which
/// usernames exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFailure {
    UnknownUser,
    WrongPassword,
    Locked,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Insufficient parameters: {0} is required")]
    MissingParameters(&'static str),
    #[error("User with the given username or email already exists")]
    DuplicateEntity,
    #[error("Invalid username or password")]
    InvalidCredentials(CredentialFailure),
    #[error("Invalid OTP")]
    InvalidOtp,
    #[error("Invalid Code")]
    InvalidCode,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Non-error outcomes of a forgot-password request. `NotFound` deliberately
/// is not an `AuthError`: an unknown email means "nothing to do", reported
/// with its own status tag on a 200.
#[derive(Debug, PartialEq, Eq)]
pub enum ForgotPasswordOutcome {
    Sent,
    NotFound,
}

#[derive(Clone, Copy, Debug)]
pub struct AuthPolicy {
    pub otp_ttl_minutes: i64,
    pub max_login_retry: i32,
    pub login_lockout_minutes: i64,
}

/// Orchestrates register, login and the password-reset flow against the
/// credential store, token issuer, OTP generator and mailer.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
    tokens: Arc<TokenIssuer>,
    otp: Arc<OtpGenerator>,
    policy: AuthPolicy,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
        tokens: Arc<TokenIssuer>,
        otp: Arc<OtpGenerator>,
        policy: AuthPolicy,
    ) -> Self {
        Self {
            users,
            notifier,
            tokens,
            otp,
            policy,
        }
    }

    /// Create a new user. Does not log the user in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Uuid, AuthError> {
        let username = required(&request.username, "username")?;
        let password = required(&request.password, "password")?;
        let email = required(&request.email, "email")?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AuthError::DuplicateEntity);
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::DuplicateEntity);
        }

        let password_hash =
            bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(anyhow::Error::from)?;
        let user = User::from_register(request, password_hash);
        self.users.insert(&user).await?;

        tracing::info!("registered user {} ({})", user.username, user.id);
        Ok(user.id)
    }

    /// Verify credentials and issue a bearer token. Failed attempts bump the
    /// per-user retry counter; crossing the limit locks the account for the
    /// configured window.
    pub async fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<(User, String), AuthError> {
        let username = username
            .filter(|v| !v.is_empty())
            .ok_or(AuthError::MissingParameters("username"))?;
        let password = password
            .filter(|v| !v.is_empty())
            .ok_or(AuthError::MissingParameters("password"))?;

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials(CredentialFailure::UnknownUser))?;

        let now = Utc::now();
        if let Some(until) = user.login_reactive_time {
            if until > now {
                return Err(AuthError::InvalidCredentials(CredentialFailure::Locked));
            }
            // Lockout has lapsed; the old failures no longer count toward
            // the limit.
            self.users.reset_login_retry(user.id).await?;
        }

        let verified =
            bcrypt::verify(password, &user.password).map_err(anyhow::Error::from)?;
        if !verified {
            let attempts = self.users.increment_login_retry(user.id).await?;
            if attempts >= self.policy.max_login_retry {
                let until = now + Duration::minutes(self.policy.login_lockout_minutes);
                self.users.set_login_lockout(user.id, until).await?;
                tracing::warn!("locked account {} until {}", user.username, until);
            }
            return Err(AuthError::InvalidCredentials(
                CredentialFailure::WrongPassword,
            ));
        }

        self.users.reset_login_retry(user.id).await?;
        let token = self
            .tokens
            .issue(&user)
            .map_err(|e| AuthError::Store(anyhow::Error::from(e)))?;

        Ok((user, token))
    }

    /// Issue a fresh OTP to the account behind `email`, overwriting any
    /// previously issued code. Unknown emails are a benign non-error.
    pub async fn forgot_password(&self, email: &str) -> Result<ForgotPasswordOutcome, AuthError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => return Ok(ForgotPasswordOutcome::NotFound),
        };

        let link = ResetPasswordLink {
            code: self.otp.generate()?,
            expire_time: Utc::now() + Duration::minutes(self.policy.otp_ttl_minutes),
        };
        self.users
            .set_reset_password_link(user.id, Some(link.clone()))
            .await?;

        // Best-effort dispatch; the code is already persisted.
        if let Err(e) = self.notifier.send_reset_code(&user.email, &link.code).await {
            tracing::warn!("failed to send reset code to {}: {e:#}", user.email);
        }

        Ok(ForgotPasswordOutcome::Sent)
    }

    /// Check an OTP without consuming it; the code stays valid until the
    /// password is actually reset or the code expires.
    pub async fn validate_otp(&self, otp: &str) -> Result<(), AuthError> {
        let user = self
            .users
            .find_by_reset_code(otp)
            .await?
            .ok_or(AuthError::InvalidOtp)?;

        match &user.reset_password_link {
            Some(link) if !link.is_expired(Utc::now()) => Ok(()),
            _ => Err(AuthError::InvalidOtp),
        }
    }

    /// Consume a valid reset code and replace the stored password hash.
    pub async fn reset_password(&self, code: &str, new_password: &str) -> Result<(), AuthError> {
        let user = self
            .users
            .find_by_reset_code(code)
            .await?
            .ok_or(AuthError::InvalidCode)?;

        match &user.reset_password_link {
            Some(link) if !link.is_expired(Utc::now()) => {}
            _ => return Err(AuthError::InvalidCode),
        }

        let password_hash =
            bcrypt::hash(new_password, bcrypt::DEFAULT_COST).map_err(anyhow::Error::from)?;
        self.users.update_password(user.id, &password_hash).await?;

        tracing::info!("password reset for user {}", user.username);
        Ok(())
    }
}

fn required<'a>(
    value: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, AuthError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingParameters(name))
}
