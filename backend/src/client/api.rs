//! Port between the task board and the remote task service.

use async_trait::async_trait;

use crate::domain::{NewTask, SortKey, Task, TaskFilter, TaskId, TaskPatch, TaskStats};

use super::ClientError;

/// Remote task operations available to an authenticated client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetch the caller's tasks, filtered and sorted server-side.
    async fn list_tasks(&self, filter: &TaskFilter, sort: SortKey)
    -> Result<Vec<Task>, ClientError>;

    async fn stats(&self) -> Result<TaskStats, ClientError>;

    async fn create_task(&self, task: &NewTask) -> Result<Task, ClientError>;

    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ClientError>;

    async fn delete_task(&self, id: &TaskId) -> Result<(), ClientError>;
}
