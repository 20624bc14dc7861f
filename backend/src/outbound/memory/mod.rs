//! In-process adapters used when no database is configured.
//!
//! State lives behind a `tokio::sync::RwLock` and is lost on restart. These
//! adapters back local development and the HTTP test suites.

mod task_repository;
mod user_repository;

pub use task_repository::InMemoryTaskRepository;
pub use user_repository::InMemoryUserRepository;
