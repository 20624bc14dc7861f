//! Builders wiring domain services and adapters into [`HttpState`].
//!
//! A configured database pool selects the Diesel repositories; otherwise the
//! in-memory stores back the same services.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use taskdeck::domain::ports::{TaskRepository, UserRepository};
use taskdeck::domain::{AccountService, TaskService};
use taskdeck::inbound::http::state::{HttpState, HttpStatePorts};
use taskdeck::outbound::memory::{InMemoryTaskRepository, InMemoryUserRepository};
use taskdeck::outbound::persistence::{DieselTaskRepository, DieselUserRepository};
use taskdeck::outbound::security::{Argon2PasswordHasher, HmacTokenAuthority};

use super::ServerConfig;

/// Assemble services over the given repositories.
fn wire_services<U, T>(
    users: Arc<U>,
    tasks: Arc<T>,
    authority: Arc<HmacTokenAuthority>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    T: TaskRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(
        users,
        Arc::new(Argon2PasswordHasher),
        authority.clone(),
    ));
    let task_service = Arc::new(TaskService::new(tasks, clock));
    HttpState::new(
        HttpStatePorts {
            login: accounts.clone(),
            settings: accounts,
            tasks: task_service.clone(),
            tasks_query: task_service,
        },
        authority,
    )
}

/// Build the shared HTTP state from the server configuration.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let authority = Arc::new(HmacTokenAuthority::new(
        config.token_secret.clone(),
        config.token_ttl,
        clock.clone(),
    ));

    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL task and user stores");
            wire_services(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselTaskRepository::new(pool.clone())),
                authority,
                clock,
            )
        }
        None => {
            warn!("no database configured; tasks and accounts are kept in memory");
            wire_services(
                Arc::new(InMemoryUserRepository::default()),
                Arc::new(InMemoryTaskRepository::default()),
                authority,
                clock,
            )
        }
    };
    web::Data::new(state)
}
