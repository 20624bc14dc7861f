//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`TaskRepository`, `UserRepository`, `PasswordHasher`,
//! `AccessTokenIssuer`, `AccessTokenVerifier`) are implemented by outbound
//! adapters. Driving ports (`LoginService`, `UserSettingsCommand`,
//! `TaskCommand`, `TaskQuery`) are implemented by domain services and called
//! by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod access_token;
mod login_service;
mod password_hasher;
mod task_command;
mod task_query;
mod task_repository;
mod user_repository;
mod user_settings_command;

#[cfg(test)]
pub use access_token::{MockAccessTokenIssuer, MockAccessTokenVerifier};
pub use access_token::{AccessTokenError, AccessTokenIssuer, AccessTokenVerifier};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{LoginOutcome, LoginService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use task_command::MockTaskCommand;
pub use task_command::TaskCommand;
#[cfg(test)]
pub use task_query::MockTaskQuery;
pub use task_query::TaskQuery;
#[cfg(test)]
pub use task_repository::MockTaskRepository;
pub use task_repository::{TaskRepository, TaskRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    NewUserRecord, StoredCredentials, UserPersistenceError, UserRepository,
};
#[cfg(test)]
pub use user_settings_command::MockUserSettingsCommand;
pub use user_settings_command::UserSettingsCommand;
