//! Statistics aggregator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Task, TaskPriority, TaskStatus};

/// Per-owner task counters.
///
/// An owner without tasks gets the all-zero record, never an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
    /// High-priority tasks regardless of status.
    pub high_priority: u64,
    /// Pending tasks whose due date lies before the evaluation instant.
    pub overdue: u64,
}

impl TaskStats {
    /// Count `tasks` in a single pass, judging overdue against `now`.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use taskdeck::domain::TaskStats;
    ///
    /// assert_eq!(TaskStats::tally(std::iter::empty(), Utc::now()), TaskStats::default());
    /// ```
    pub fn tally<'a, I>(tasks: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        tasks.into_iter().fold(Self::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Pending => stats.pending += 1,
            }
            if task.priority == TaskPriority::High {
                stats.high_priority += 1;
            }
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
            stats
        })
    }
}
