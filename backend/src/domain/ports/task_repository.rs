//! Driven port for the task store.
//!
//! Every operation is scoped by owner. Adapters return tasks from
//! [`TaskRepository::find_many`] already ordered by the requested
//! [`SortKey`], with ties kept in insertion order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewTask, SortKey, Task, TaskId, TaskPatch, TaskPredicate, TaskStats, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by task store adapters.
    pub enum TaskRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } => "task store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "task store query failed: {message}",
    }
}

/// Owner-scoped task storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persist a new task for `owner`, assigning its id and timestamps.
    async fn insert(
        &self,
        owner: &UserId,
        task: &NewTask,
        now: DateTime<Utc>,
    ) -> Result<Task, TaskRepositoryError>;

    /// Retrieve every task satisfying `predicate`, ordered by `sort`.
    async fn find_many(
        &self,
        predicate: &TaskPredicate,
        sort: SortKey,
    ) -> Result<Vec<Task>, TaskRepositoryError>;

    /// Apply `patch` to the owner's task; `None` when it does not exist or
    /// belongs to someone else.
    async fn update_one(
        &self,
        id: &TaskId,
        owner: &UserId,
        patch: &TaskPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskRepositoryError>;

    /// Remove the owner's task, reporting whether a record was deleted.
    async fn delete_one(&self, id: &TaskId, owner: &UserId) -> Result<bool, TaskRepositoryError>;

    /// Aggregate counters for the owner, judging overdue against `now`.
    async fn stats(
        &self,
        owner: &UserId,
        now: DateTime<Utc>,
    ) -> Result<TaskStats, TaskRepositoryError>;
}
