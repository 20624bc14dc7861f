//! Sort policy for task listings.
//!
//! A closed set of keys resolved through a lookup table. Unknown keys fall
//! back to [`SortKey::Created`]. Sorting is stable, so ties keep retrieval
//! order.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};

use super::Task;

/// Ordering applied to task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Newest first by creation time.
    #[default]
    Created,
    /// Earliest due date first.
    ///
    /// A task without a due date sorts as if due at the Unix epoch, so undated
    /// tasks come before every dated one. Clients depend on this placement.
    DueDate,
    /// Highest priority first.
    Priority,
}

const SORT_KEYS: &[(&str, SortKey)] = &[
    ("created", SortKey::Created),
    ("dueDate", SortKey::DueDate),
    ("priority", SortKey::Priority),
];

impl SortKey {
    /// Resolve a raw `sortBy` value, defaulting to [`SortKey::Created`].
    ///
    /// # Examples
    /// ```
    /// use taskdeck::domain::SortKey;
    ///
    /// assert_eq!(SortKey::parse(Some("priority")), SortKey::Priority);
    /// assert_eq!(SortKey::parse(Some("alphabetical")), SortKey::Created);
    /// assert_eq!(SortKey::parse(None), SortKey::Created);
    /// ```
    pub fn parse(raw: Option<&str>) -> Self {
        raw.map(str::trim)
            .and_then(|wanted| {
                SORT_KEYS
                    .iter()
                    .find(|(name, _)| *name == wanted)
                    .map(|(_, key)| *key)
            })
            .unwrap_or_default()
    }

    /// Wire name used in the `sortBy` query parameter.
    pub fn as_str(self) -> &'static str {
        SORT_KEYS
            .iter()
            .find(|(_, key)| *key == self)
            .map_or("created", |(name, _)| *name)
    }

    /// Compare two tasks under this key.
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::Created => b.created_at.cmp(&a.created_at),
            Self::DueDate => due_or_epoch(a).cmp(&due_or_epoch(b)),
            Self::Priority => b.priority.rank().cmp(&a.priority.rank()),
        }
    }

    /// Stable in-place sort of `tasks` under this key.
    pub fn arrange(self, tasks: &mut [Task]) {
        tasks.sort_by(|a, b| self.compare(a, b));
    }
}

fn due_or_epoch(task: &Task) -> DateTime<Utc> {
    task.due_date.unwrap_or(DateTime::UNIX_EPOCH)
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewTask, TaskId, TaskPriority, TaskText, UserId};
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn task(label: &str) -> Task {
        let new = NewTask::titled(TaskText::new(label).expect("valid text"));
        Task::from_new(TaskId::random(), UserId::random(), &new, Utc::now())
    }

    fn labels(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.text.as_ref()).collect()
    }

    #[rstest]
    #[case("created", SortKey::Created)]
    #[case("dueDate", SortKey::DueDate)]
    #[case("priority", SortKey::Priority)]
    #[case("duedate", SortKey::Created)]
    #[case("", SortKey::Created)]
    fn parse_uses_lookup_with_fallback(#[case] raw: &str, #[case] expected: SortKey) {
        assert_eq!(SortKey::parse(Some(raw)), expected);
    }

    #[rstest]
    fn priority_sort_is_descending_and_stable() {
        let mut tasks: Vec<Task> = [
            ("a", TaskPriority::Low),
            ("b", TaskPriority::High),
            ("c", TaskPriority::Medium),
            ("d", TaskPriority::High),
        ]
        .into_iter()
        .map(|(label, priority)| {
            let mut t = task(label);
            t.priority = priority;
            t
        })
        .collect();

        SortKey::Priority.arrange(&mut tasks);
        assert_eq!(labels(&tasks), ["b", "d", "c", "a"]);
    }

    #[rstest]
    fn due_date_sort_places_undated_first() {
        let mut dated = task("dated");
        dated.due_date = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).single();
        let undated = task("undated");
        let mut tasks = vec![dated, undated];

        SortKey::DueDate.arrange(&mut tasks);
        assert_eq!(labels(&tasks), ["undated", "dated"]);
    }

    #[rstest]
    fn created_sort_is_newest_first() {
        let base = Utc::now();
        let mut older = task("older");
        older.created_at = base - Duration::hours(1);
        let mut newer = task("newer");
        newer.created_at = base;
        let mut tasks = vec![older, newer];

        SortKey::Created.arrange(&mut tasks);
        assert_eq!(labels(&tasks), ["newer", "older"]);
    }

    #[rstest]
    fn wire_names_round_trip() {
        for (name, key) in SORT_KEYS {
            assert_eq!(key.as_str(), *name);
            assert_eq!(SortKey::parse(Some(*name)), *key);
        }
    }
}
