//! Domain service for authentication.
//!
//! Handles admin bootstrap, credential verification, and bearer token
//! issue/resolution.

use serde::Serialize;
use thiserror::Error;

use crate::models::{Role, User};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    /// Login distinguishes an unknown username from a wrong password.
    #[error("Incorrect username")]
    IncorrectUsername,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Admin already exists")]
    AdminExists,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        // `{:#}` keeps the context chain on one line
        Self::Internal(format!("{err:#}"))
    }
}

/// User info DTO for responses. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

/// Login result containing user info and a bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub user: UserInfo,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates the single administrator account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if either field is empty and
    /// [`AuthError::AdminExists`] if an admin is already stored.
    async fn create_admin(&self, username: &str, password: &str) -> Result<UserInfo, AuthError>;

    /// Checks a username/password pair against the stored hash.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::IncorrectUsername`] or [`AuthError::IncorrectPassword`].
    async fn verify(&self, username: &str, password: &str) -> Result<UserInfo, AuthError>;

    /// Verifies credentials and issues a bearer token for the user.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// Resolves an `Authorization` header value to the user it names.
    ///
    /// # Errors
    ///
    /// Every rejection is [`AuthError::Unauthenticated`]; store failures are
    /// [`AuthError::Internal`].
    async fn resolve(&self, authorization: Option<&str>) -> Result<UserInfo, AuthError>;
}
