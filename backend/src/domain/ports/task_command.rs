//! Driving port for task mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewTask, Task, TaskId, TaskPatch, UserId};

/// Task mutations on behalf of an authenticated owner.
///
/// Missing and foreign tasks both surface as `not_found`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskCommand: Send + Sync {
    async fn create(&self, owner: &UserId, task: NewTask) -> Result<Task, Error>;

    async fn update(&self, owner: &UserId, id: &TaskId, patch: TaskPatch) -> Result<Task, Error>;

    async fn delete(&self, owner: &UserId, id: &TaskId) -> Result<(), Error>;
}
