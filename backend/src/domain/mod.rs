//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the API, the client and the
//! persistence adapters, plus the services implementing the driving ports.
//! Document invariants and serialisation contracts (serde) in each type's
//! Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode — API error payload and stable error identifier.
//! - User, Username, UserSettings — accounts and display preferences.
//! - Task and its value types — the task record and validated inputs.
//! - TaskFilter / TaskPredicate — query builder.
//! - SortKey — sort policy.
//! - TaskStats — statistics aggregator.
//! - TaskService, AccountService — driving port implementations.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod ports;
pub mod task;
pub mod task_filter;
pub mod task_order;
pub mod task_service;
pub mod task_stats;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AccessToken, LoginCredentials, LoginValidationError, PASSWORD_MAX_BYTES, PasswordDigest,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::task::{
    NewTask, TASK_TEXT_MAX, Task, TaskId, TaskPatch, TaskPriority, TaskStatus, TaskText,
    TaskValidationError, normalize_categories, parse_due_date,
};
pub use self::task_filter::{ALL_SENTINEL, TaskFilter, TaskPredicate};
pub use self::task_order::SortKey;
pub use self::task_service::TaskService;
pub use self::task_stats::TaskStats;
pub use self::trace_id::TraceId;
pub use self::user::{
    DEFAULT_THEME, DEFAULT_VIEW, USERNAME_MAX, User, UserId, UserSettings, UserSettingsPatch,
    UserValidationError, Username,
};

