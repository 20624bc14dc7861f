//! Driving port for registration and login.
//!
//! Inbound adapters call it to create accounts and exchange credentials for a
//! bearer token without importing the hashing or persistence adapters.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, LoginCredentials, User, UserId, UserSettings};

/// Successful login result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user_id: UserId,
    pub token: AccessToken,
    pub settings: UserSettings,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Create an account with default settings.
    async fn register(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Validate credentials and issue an access token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;
}
