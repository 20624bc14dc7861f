//! Account domain service: registration, login and settings updates.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccessTokenError, AccessTokenIssuer, LoginOutcome, LoginService, NewUserRecord,
    PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository, UserSettingsCommand,
};
use crate::domain::{
    Error, LoginCredentials, User, UserId, UserSettings, UserSettingsPatch,
};

const INVALID_CREDENTIALS: &str = "invalid username or password";

/// Account service implementing [`LoginService`] and [`UserSettingsCommand`].
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<dyn AccessTokenIssuer>,
}

impl<U, H> AccountService<U, H> {
    /// Create a new service with the given adapters.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<dyn AccessTokenIssuer>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => {
            Error::conflict(format!("username {username} is already taken")).with_details(json!({
                "field": "username",
                "code": "duplicate_username",
            }))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: AccessTokenError) -> Error {
    Error::internal(error.to_string())
}

fn user_not_found(id: &UserId) -> Error {
    Error::not_found("user not found").with_details(json!({
        "id": id.to_string(),
        "code": "user_not_found",
    }))
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let password = self
            .hasher
            .hash(credentials.password())
            .await
            .map_err(map_hash_error)?;
        let record = NewUserRecord {
            id: UserId::random(),
            username: credentials.username().clone(),
            password,
            settings: UserSettings::default(),
        };
        let user = self.users.create(&record).await.map_err(map_user_error)?;
        info!(user_id = %user.id(), username = %user.username(), "user registered");
        Ok(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let Some(stored) = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(map_user_error)?
        else {
            warn!(username = %credentials.username(), "login for unknown user");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &stored.password)
            .await
            .map_err(map_hash_error)?;
        if !verified {
            warn!(user_id = %stored.user.id(), "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self
            .tokens
            .issue(stored.user.id())
            .map_err(map_token_error)?;
        info!(user_id = %stored.user.id(), "user logged in");
        Ok(LoginOutcome {
            user_id: *stored.user.id(),
            token,
            settings: stored.user.settings().clone(),
        })
    }
}

#[async_trait]
impl<U, H> UserSettingsCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn update_settings(
        &self,
        user_id: &UserId,
        patch: UserSettingsPatch,
    ) -> Result<UserSettings, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(user_id))?;
        let merged = user.settings().clone().merged(patch);
        self.users
            .update_settings(user_id, &merged)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(user_id))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
