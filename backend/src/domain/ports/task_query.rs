//! Driving port for task reads.

use async_trait::async_trait;

use crate::domain::{Error, SortKey, Task, TaskFilter, TaskStats, UserId};

/// Domain use-case port for listing tasks and statistics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskQuery: Send + Sync {
    /// Owner's tasks matching `filter`, ordered by `sort`.
    async fn list(&self, owner: &UserId, filter: &TaskFilter, sort: SortKey)
    -> Result<Vec<Task>, Error>;

    /// Owner's counters as of now.
    async fn stats(&self, owner: &UserId) -> Result<TaskStats, Error>;
}
