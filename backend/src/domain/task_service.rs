//! Task domain service.
//!
//! Implements the [`TaskCommand`] and [`TaskQuery`] driving ports on top of a
//! [`TaskRepository`]. The service stamps times from an injected clock, turns
//! empty update/delete results into `not_found`, and maps store failures to
//! domain errors.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{TaskCommand, TaskQuery, TaskRepository, TaskRepositoryError};
use crate::domain::{
    Error, NewTask, SortKey, Task, TaskFilter, TaskId, TaskPatch, TaskPredicate, TaskStats, UserId,
};

/// Task service implementing the task driving ports.
#[derive(Clone)]
pub struct TaskService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> TaskService<R> {
    /// Create a new service over `repo`, reading time from `clock`.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// use taskdeck::domain::TaskService;
    /// use taskdeck::outbound::memory::InMemoryTaskRepository;
    ///
    /// let service = TaskService::new(
    ///     Arc::new(InMemoryTaskRepository::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

fn map_repository_error(error: TaskRepositoryError) -> Error {
    match error {
        TaskRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("task store unavailable: {message}"))
        }
        TaskRepositoryError::Query { message } => {
            Error::internal(format!("task store error: {message}"))
        }
    }
}

fn task_not_found(id: &TaskId) -> Error {
    Error::not_found("task not found").with_details(json!({
        "id": id.to_string(),
        "code": "task_not_found",
    }))
}

#[async_trait]
impl<R> TaskCommand for TaskService<R>
where
    R: TaskRepository,
{
    async fn create(&self, owner: &UserId, task: NewTask) -> Result<Task, Error> {
        let created = self
            .repo
            .insert(owner, &task, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %owner, task_id = %created.id, "task created");
        Ok(created)
    }

    async fn update(&self, owner: &UserId, id: &TaskId, patch: TaskPatch) -> Result<Task, Error> {
        let updated = self
            .repo
            .update_one(id, owner, &patch, self.clock.utc())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| task_not_found(id))?;
        info!(user_id = %owner, task_id = %id, "task updated");
        Ok(updated)
    }

    async fn delete(&self, owner: &UserId, id: &TaskId) -> Result<(), Error> {
        let removed = self
            .repo
            .delete_one(id, owner)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(task_not_found(id));
        }
        info!(user_id = %owner, task_id = %id, "task deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> TaskQuery for TaskService<R>
where
    R: TaskRepository,
{
    async fn list(
        &self,
        owner: &UserId,
        filter: &TaskFilter,
        sort: SortKey,
    ) -> Result<Vec<Task>, Error> {
        let predicate = TaskPredicate::new(*owner, filter.clone());
        self.repo
            .find_many(&predicate, sort)
            .await
            .map_err(map_repository_error)
    }

    async fn stats(&self, owner: &UserId) -> Result<TaskStats, Error> {
        self.repo
            .stats(owner, self.clock.utc())
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "task_service_tests.rs"]
mod tests;
