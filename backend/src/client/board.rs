//! Client-side mirror of the task list.
//!
//! The board keeps the last server fetch as an immutable [`TaskSnapshot`] and
//! derives the visible list from it with [`ViewState::project`], so changing
//! filters, search or sort order never touches the network. Every mutation
//! goes through the [`TaskApi`] and then replaces the snapshot and statistics
//! wholesale; local records are never patched in place.
//!
//! A mutation the server accepted is reported as a success even when the
//! follow-up fetch fails. The board then keeps its previous snapshot and
//! [`TaskBoard::is_stale`] returns `true` until the next successful refresh.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{
    NewTask, SortKey, Task, TaskFilter, TaskId, TaskPatch, TaskPriority, TaskStats, TaskStatus,
};

use super::{ClientError, TaskApi};

/// Result of one server fetch. Cheap to clone and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSnapshot {
    tasks: Arc<[Task]>,
}

impl TaskSnapshot {
    /// Freeze a fetched task list.
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks: tasks.into(),
        }
    }

    /// Tasks in server order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look up a task by id.
    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == *id)
    }

    /// Distinct category labels across the snapshot, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.tasks
            .iter()
            .flat_map(|task| task.categories.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Filter and sort order the user is currently looking at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub filter: TaskFilter,
    pub sort: SortKey,
}

impl ViewState {
    /// Apply the filter and ordering to a snapshot without side effects.
    ///
    /// # Examples
    /// ```
    /// use taskdeck::client::{TaskSnapshot, ViewState};
    ///
    /// let view = ViewState::default();
    /// assert!(view.project(&TaskSnapshot::default()).is_empty());
    /// ```
    pub fn project(&self, snapshot: &TaskSnapshot) -> Vec<Task> {
        let mut visible: Vec<Task> = snapshot
            .tasks()
            .iter()
            .filter(|task| self.filter.matches(task))
            .cloned()
            .collect();
        self.sort.arrange(&mut visible);
        visible
    }
}

/// Snapshot, statistics and view state backed by a [`TaskApi`].
pub struct TaskBoard<A> {
    api: A,
    snapshot: TaskSnapshot,
    stats: TaskStats,
    view: ViewState,
    stale: bool,
}

impl<A: TaskApi> TaskBoard<A> {
    /// An empty board; call [`TaskBoard::refresh`] to load data.
    pub fn new(api: A) -> Self {
        Self {
            api,
            snapshot: TaskSnapshot::default(),
            stats: TaskStats::default(),
            view: ViewState::default(),
            stale: false,
        }
    }

    /// Underlying transport.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Last successfully fetched task list.
    pub fn snapshot(&self) -> &TaskSnapshot {
        &self.snapshot
    }

    /// Statistics fetched alongside the snapshot.
    pub fn stats(&self) -> TaskStats {
        self.stats
    }

    /// Current filter and sort order.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Whether a committed mutation has not been reflected in the snapshot
    /// because the follow-up fetch failed.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Tasks visible under the current view.
    pub fn visible(&self) -> Vec<Task> {
        self.view.project(&self.snapshot)
    }

    /// Re-fetch every task and the statistics, replacing both.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let tasks = self
            .api
            .list_tasks(&TaskFilter::default(), SortKey::default())
            .await?;
        let stats = self.api.stats().await?;
        debug!(tasks = tasks.len(), "task snapshot refreshed");
        self.snapshot = TaskSnapshot::new(tasks);
        self.stats = stats;
        self.stale = false;
        Ok(())
    }

    async fn refresh_after_mutation(&mut self) {
        if let Err(error) = self.refresh().await {
            warn!(%error, "task snapshot is stale after a committed mutation");
            self.stale = true;
        }
    }

    /// Replace the whole filter, for example one built with
    /// [`TaskFilter::parse`] from raw user input.
    pub fn set_filter(&mut self, filter: TaskFilter) {
        self.view.filter = filter;
    }

    /// Show only tasks with `status`, or every status for `None`.
    pub fn set_status_filter(&mut self, status: Option<TaskStatus>) {
        self.view.filter = self.view.filter.clone().with_status(status);
    }

    /// Show only tasks with `priority`, or every priority for `None`.
    pub fn set_priority_filter(&mut self, priority: Option<TaskPriority>) {
        self.view.filter = self.view.filter.clone().with_priority(priority);
    }

    /// Show only tasks carrying the label. Blank and `all` clear the
    /// constraint.
    pub fn set_category_filter(&mut self, category: Option<String>) {
        self.view.filter = self.view.filter.clone().with_category(category);
    }

    /// Case-insensitive substring search; blank clears it.
    pub fn set_search(&mut self, search: Option<String>) {
        self.view.filter = self.view.filter.clone().with_search(search);
    }

    /// Change the display order.
    pub fn set_sort(&mut self, sort: SortKey) {
        self.view.sort = sort;
    }

    /// Drop every filter while keeping the sort order.
    pub fn clear_filters(&mut self) {
        self.view.filter = TaskFilter::default();
    }

    /// Create a task on the server, then refresh.
    pub async fn create(&mut self, task: NewTask) -> Result<Task, ClientError> {
        let created = self.api.create_task(&task).await?;
        self.refresh_after_mutation().await;
        Ok(created)
    }

    /// Apply `patch` on the server, then refresh.
    pub async fn update(&mut self, id: &TaskId, patch: TaskPatch) -> Result<Task, ClientError> {
        let updated = self.api.update_task(id, &patch).await?;
        self.refresh_after_mutation().await;
        Ok(updated)
    }

    /// Flip a task between pending and completed.
    ///
    /// The current status comes from the snapshot; the server stays the
    /// source of truth for the result.
    pub async fn toggle(&mut self, id: &TaskId) -> Result<Task, ClientError> {
        let status = self
            .snapshot
            .find(id)
            .map(|task| task.status.toggled())
            .ok_or(ClientError::UnknownTask { id: *id })?;
        self.update(id, TaskPatch::status(status)).await
    }

    /// Delete a task on the server, then refresh.
    pub async fn delete(&mut self, id: &TaskId) -> Result<(), ClientError> {
        self.api.delete_task(id).await?;
        self.refresh_after_mutation().await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod tests;
