//! Task data model.
//!
//! Tasks are owned by exactly one user. Value types validate raw input once so
//! the services and adapters can rely on the invariants below:
//! - `text` is trimmed and non-empty.
//! - `categories` holds trimmed, non-blank labels in submission order.
//! - `updated_at` is never earlier than `created_at`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Maximum number of characters accepted in a task title.
pub const TASK_TEXT_MAX: usize = 500;

/// Validation errors raised while building task values from raw input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskValidationError {
    #[error("task id must be a valid UUID")]
    InvalidId,
    #[error("task text must not be empty")]
    EmptyText,
    #[error("task text must be at most {max} characters")]
    TextTooLong { max: usize },
    #[error("unknown task status `{0}`")]
    UnknownStatus(String),
    #[error("unknown task priority `{0}`")]
    UnknownPriority(String),
    #[error("due date `{0}` must be an RFC 3339 timestamp or YYYY-MM-DD")]
    InvalidDueDate(String),
}

impl TaskValidationError {
    /// Name of the wire field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyText | Self::TextTooLong { .. } => "text",
            Self::UnknownStatus(_) => "status",
            Self::UnknownPriority(_) => "priority",
            Self::InvalidDueDate(_) => "dueDate",
        }
    }

    /// Stable machine-readable code for error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::EmptyText => "empty_text",
            Self::TextTooLong { .. } => "text_too_long",
            Self::UnknownStatus(_) => "unknown_status",
            Self::UnknownPriority(_) => "unknown_priority",
            Self::InvalidDueDate(_) => "invalid_due_date",
        }
    }
}

/// Store-assigned task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(Uuid);

impl TaskId {
    /// Parse a [`TaskId`] from its string form.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TaskValidationError> {
        Uuid::parse_str(raw.as_ref())
            .map(Self)
            .map_err(|_| TaskValidationError::InvalidId)
    }

    /// Wrap a UUID read from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for TaskId {
    type Error = TaskValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Short task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskText(String);

impl TaskText {
    /// Validate and trim a task title.
    ///
    /// # Examples
    /// ```
    /// use taskdeck::domain::TaskText;
    ///
    /// assert_eq!(TaskText::new("  Buy milk ").unwrap().as_ref(), "Buy milk");
    /// assert!(TaskText::new("   ").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TaskValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        if trimmed.chars().count() > TASK_TEXT_MAX {
            return Err(TaskValidationError::TextTooLong { max: TASK_TEXT_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TaskText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TaskText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TaskText> for String {
    fn from(value: TaskText) -> Self {
        value.0
    }
}

impl TryFrom<String> for TaskText {
    type Error = TaskValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Completion state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
}

impl TaskStatus {
    /// Wire and storage spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// The opposite state, used by the client's completion toggle.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(TaskValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

/// Relative importance of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    /// Wire and storage spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Sort rank; higher ranks sort first under the priority key.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = TaskValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(TaskValidationError::UnknownPriority(other.to_owned())),
        }
    }
}

/// Parse a due date given either as an RFC 3339 timestamp or as a bare
/// `YYYY-MM-DD` date, which is read as midnight UTC.
///
/// # Examples
/// ```
/// use taskdeck::domain::parse_due_date;
///
/// let date = parse_due_date("2030-01-01").unwrap();
/// assert_eq!(date.to_rfc3339(), "2030-01-01T00:00:00+00:00");
/// ```
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, TaskValidationError> {
    let trimmed = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TaskValidationError::InvalidDueDate(raw.to_owned()))
}

/// Trim category labels and drop blank ones, preserving order.
pub fn normalize_categories<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .filter_map(|label| {
            let trimmed = label.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        })
        .collect()
}

/// Stored task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub owner_id: UserId,
    pub text: TaskText,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Materialise a freshly inserted task.
    pub fn from_new(id: TaskId, owner_id: UserId, new: &NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id,
            text: new.text.clone(),
            description: new.description.clone(),
            status: new.status,
            priority: new.priority,
            due_date: new.due_date,
            categories: new.categories.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the task is pending and its due date lies before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == TaskStatus::Pending && self.due_date.is_some_and(|due| due < now)
    }
}

/// Validated input for task creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub text: TaskText,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
}

impl NewTask {
    /// A pending, medium-priority task with only a title.
    pub fn titled(text: TaskText) -> Self {
        Self {
            text,
            description: String::new(),
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
            categories: Vec::new(),
        }
    }
}

/// Partial update for a task. `None` leaves a field untouched;
/// `due_date: Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TaskText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

impl TaskPatch {
    /// Patch that only changes the completion state.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Apply the patch in place and stamp `updated_at`.
    ///
    /// `updated_at` advances even when no field changes, so repeating an
    /// identical patch only moves the timestamp.
    pub fn apply(&self, task: &mut Task, now: DateTime<Utc>) {
        if let Some(text) = &self.text {
            task.text = text.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(categories) = &self.categories {
            task.categories = categories.clone();
        }
        task.updated_at = now.max(task.created_at);
    }
}
