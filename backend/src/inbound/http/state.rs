//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccessTokenVerifier, LoginService, TaskCommand, TaskQuery, UserSettingsCommand,
};

/// Parameter object bundling the driving ports used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub settings: Arc<dyn UserSettingsCommand>,
    pub tasks: Arc<dyn TaskCommand>,
    pub tasks_query: Arc<dyn TaskQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub settings: Arc<dyn UserSettingsCommand>,
    pub tasks: Arc<dyn TaskCommand>,
    pub tasks_query: Arc<dyn TaskQuery>,
    /// Verifies bearer tokens for the authenticated routes.
    pub tokens: Arc<dyn AccessTokenVerifier>,
}

impl HttpState {
    /// Construct state from the driving ports and a token verifier.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use taskdeck::domain::{AccountService, TaskService};
    /// use taskdeck::inbound::http::state::{HttpState, HttpStatePorts};
    /// use taskdeck::outbound::memory::{InMemoryTaskRepository, InMemoryUserRepository};
    /// use taskdeck::outbound::security::{Argon2PasswordHasher, HmacTokenAuthority, TokenSecret};
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let tokens = Arc::new(HmacTokenAuthority::new(
    ///     TokenSecret::generate(),
    ///     chrono::Duration::hours(24),
    ///     clock.clone(),
    /// ));
    /// let accounts = Arc::new(AccountService::new(
    ///     Arc::new(InMemoryUserRepository::default()),
    ///     Arc::new(Argon2PasswordHasher),
    ///     tokens.clone(),
    /// ));
    /// let tasks = Arc::new(TaskService::new(Arc::new(InMemoryTaskRepository::default()), clock));
    ///
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         login: accounts.clone(),
    ///         settings: accounts,
    ///         tasks: tasks.clone(),
    ///         tasks_query: tasks,
    ///     },
    ///     tokens,
    /// );
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, tokens: Arc<dyn AccessTokenVerifier>) -> Self {
        let HttpStatePorts {
            login,
            settings,
            tasks,
            tasks_query,
        } = ports;
        Self {
            login,
            settings,
            tasks,
            tasks_query,
            tokens,
        }
    }
}
