//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUserRecord, StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{PasswordDigest, User, UserId, UserSettings, Username};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewUserRow, UserRow, UserSettingsUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::UniqueViolation { constraint } => {
            UserPersistenceError::query(format!(
                "unique constraint violated: {}",
                constraint.as_deref().unwrap_or("unknown")
            ))
        }
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

fn row_to_user(row: &UserRow) -> Result<User, UserPersistenceError> {
    let username = Username::new(&row.username).map_err(|err| {
        UserPersistenceError::query(format!("stored user {} is invalid: {err}", row.id))
    })?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        username,
        UserSettings {
            theme: row.theme.clone(),
            default_view: row.default_view.clone(),
        },
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, record: &NewUserRecord) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *record.id.as_uuid(),
            username: record.username.as_ref(),
            password_hash: record.password.as_str(),
            theme: record.settings.theme.as_str(),
            default_view: record.settings.default_view.as_str(),
        };

        let inserted = diesel::insert_into(users::table)
            .values(&row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| match classify_diesel_error(err) {
                DieselFailure::UniqueViolation { .. } => {
                    UserPersistenceError::duplicate_username(record.username.as_ref())
                }
                DieselFailure::Connection(message) => UserPersistenceError::connection(message),
                DieselFailure::Query(message) => UserPersistenceError::query(message),
            })?;
        row_to_user(&inserted)
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            Ok(StoredCredentials {
                user: row_to_user(&row)?,
                password: PasswordDigest::new(row.password_hash),
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn update_settings(
        &self,
        id: &UserId,
        settings: &UserSettings,
    ) -> Result<Option<UserSettings>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserSettingsUpdate {
            theme: settings.theme.as_str(),
            default_view: settings.default_view.as_str(),
            updated_at: Utc::now(),
        };

        let row: Option<UserRow> = diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|row| UserSettings {
            theme: row.theme,
            default_view: row.default_view,
        }))
    }
}
