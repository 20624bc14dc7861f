//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{PasswordDigest, User, UserId, UserSettings, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the username.
        DuplicateUsername { username: String } => "username already taken: {username}",
    }
}

/// Account row to insert at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    pub id: UserId,
    pub username: Username,
    pub password: PasswordDigest,
    pub settings: UserSettings,
}

/// A user together with the stored password digest, for login checks only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password: PasswordDigest,
}

/// Account and settings storage keyed by id and username.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with
    /// [`UserPersistenceError::DuplicateUsername`] when the name is taken.
    async fn create(&self, record: &NewUserRecord) -> Result<User, UserPersistenceError>;

    /// Look up an account and its digest by username.
    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Replace the stored settings; `None` when the user does not exist.
    async fn update_settings(
        &self,
        id: &UserId,
        settings: &UserSettings,
    ) -> Result<Option<UserSettings>, UserPersistenceError>;
}
