//! Query builder: optional task filters and the owner-scoped predicate.
//!
//! [`TaskFilter`] holds one optional constraint per dimension. Absent
//! constraints match everything and supplied ones combine with logical AND.
//! The in-memory store and the client mirror evaluate [`TaskFilter::matches`]
//! directly; the PostgreSQL adapter translates the same struct to SQL.

use super::{Task, TaskPriority, TaskStatus, TaskValidationError, UserId};

/// Sentinel filter value meaning "no constraint".
pub const ALL_SENTINEL: &str = "all";

fn meaningful(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty() && *value != ALL_SENTINEL)
}

/// Filter configuration for task retrieval.
///
/// # Examples
/// ```
/// use taskdeck::domain::{TaskFilter, TaskStatus};
///
/// let filter = TaskFilter::parse(Some("pending"), Some("all"), None, Some("  shop ")).unwrap();
/// assert_eq!(filter.status, Some(TaskStatus::Pending));
/// assert_eq!(filter.priority, None);
/// assert_eq!(filter.search.as_deref(), Some("shop"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Exact status match.
    pub status: Option<TaskStatus>,
    /// Exact priority match.
    pub priority: Option<TaskPriority>,
    /// Exact, case-sensitive category label.
    pub category: Option<String>,
    /// Case-insensitive substring over text, description and categories.
    pub search: Option<String>,
}

impl TaskFilter {
    /// Build a filter from raw query-string values.
    ///
    /// Absent, blank and `all` values impose no constraint. Status and
    /// priority values outside their enumerations are rejected.
    pub fn parse(
        status: Option<&str>,
        priority: Option<&str>,
        category: Option<&str>,
        search: Option<&str>,
    ) -> Result<Self, TaskValidationError> {
        Ok(Self {
            status: meaningful(status).map(str::parse).transpose()?,
            priority: meaningful(priority).map(str::parse).transpose()?,
            category: meaningful(category).map(str::to_owned),
            search: search
                .map(str::trim)
                .filter(|needle| !needle.is_empty())
                .map(str::to_owned),
        })
    }

    /// Replace the status constraint.
    #[must_use]
    pub fn with_status(mut self, status: Option<TaskStatus>) -> Self {
        self.status = status;
        self
    }

    /// Replace the priority constraint.
    #[must_use]
    pub fn with_priority(mut self, priority: Option<TaskPriority>) -> Self {
        self.priority = priority;
        self
    }

    /// Replace the category constraint.
    ///
    /// Normalised like [`TaskFilter::parse`]: the label is trimmed and blank
    /// or `all` values clear the constraint.
    #[must_use]
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = meaningful(category.as_deref()).map(str::to_owned);
        self
    }

    /// Replace the search needle. Surrounding whitespace is trimmed and a
    /// blank needle clears the constraint.
    #[must_use]
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|needle| needle.trim().to_owned())
            .filter(|needle| !needle.is_empty());
        self
    }

    /// Whether no dimension is constrained.
    pub fn is_unconstrained(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.search.is_none()
    }

    /// Evaluate the filter against a task, ignoring ownership.
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status == status)
            && self.priority.is_none_or(|priority| task.priority == priority)
            && self
                .category
                .as_deref()
                .is_none_or(|label| task.categories.iter().any(|c| c == label))
            && self
                .search
                .as_deref()
                .is_none_or(|needle| search_hits(task, needle))
    }
}

fn search_hits(task: &Task, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);
    contains(task.text.as_ref())
        || contains(&task.description)
        || task.categories.iter().any(|label| contains(label))
}

/// Store predicate: a filter implicitly scoped to one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPredicate {
    /// Only tasks owned by this user are visible.
    pub owner: UserId,
    /// Constraints applied within the owner's tasks.
    pub filter: TaskFilter,
}

impl TaskPredicate {
    /// Scope `filter` to tasks owned by `owner`.
    pub fn new(owner: UserId, filter: TaskFilter) -> Self {
        Self { owner, filter }
    }

    /// Every task belonging to `owner`.
    pub fn owned_by(owner: UserId) -> Self {
        Self::new(owner, TaskFilter::default())
    }

    /// Whether `task` belongs to the owner and passes the filter.
    pub fn matches(&self, task: &Task) -> bool {
        task.owner_id == self.owner && self.filter.matches(task)
    }
}
