//! PostgreSQL persistence adapters built on Diesel and `diesel-async`.
//!
//! Repositories check connections out of a shared [`DbPool`] per call and map
//! Diesel failures onto their port's error enum. Row structs in `models` never
//! leave this module.

mod diesel_error_mapping;
mod diesel_task_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_task_repository::DieselTaskRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
