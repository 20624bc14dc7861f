//! Request and response payloads for the task endpoints.
//!
//! Request bodies carry raw strings; the `parse_*` helpers validate them into
//! domain inputs and report failures as `invalid_request` with
//! `details: {field, code}`.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, NewTask, SortKey, TaskFilter, TaskPatch, TaskPriority, TaskStatus, TaskText,
    normalize_categories, parse_due_date,
};
use crate::inbound::http::validation::{
    FieldName, map_task_validation_error, missing_field_error,
};

/// Query string accepted by `GET /api/v1/tasks`.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TaskListQuery {
    /// Case-insensitive substring over text, description and categories.
    pub search: Option<String>,
    /// `pending`, `completed`, or `all`.
    pub status: Option<String>,
    /// `low`, `medium`, `high`, or `all`.
    pub priority: Option<String>,
    /// Exact category label, or `all`.
    pub category: Option<String>,
    /// `created` (default), `dueDate`, or `priority`.
    pub sort_by: Option<String>,
}

impl TaskListQuery {
    pub(crate) fn parse(&self) -> Result<(TaskFilter, SortKey), Error> {
        let filter = TaskFilter::parse(
            self.status.as_deref(),
            self.priority.as_deref(),
            self.category.as_deref(),
            self.search.as_deref(),
        )
        .map_err(map_task_validation_error)?;
        Ok((filter, SortKey::parse(self.sort_by.as_deref())))
    }
}

/// Body of `POST /api/v1/tasks`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[schema(example = "Buy milk")]
    pub text: Option<String>,
    pub description: Option<String>,
    #[schema(example = "pending")]
    pub status: Option<String>,
    #[schema(example = "medium")]
    pub priority: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[schema(example = "2030-01-01")]
    pub due_date: Option<String>,
    pub categories: Option<Vec<String>>,
}

/// Body of `PATCH /api/v1/tasks/{id}`. Omitted fields stay untouched;
/// `"dueDate": null` clears the due date.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub text: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub due_date: Option<Option<String>>,
    pub categories: Option<Vec<String>>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field
/// (`None`, via `#[serde(default)]`).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body returned by `DELETE /api/v1/tasks/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteTaskResponse {
    pub id: String,
    pub message: String,
}

fn parse_status(raw: &str) -> Result<TaskStatus, Error> {
    raw.trim().parse().map_err(map_task_validation_error)
}

fn parse_priority(raw: &str) -> Result<TaskPriority, Error> {
    raw.trim().parse().map_err(map_task_validation_error)
}

/// Blank due dates mean "no due date", matching what HTML date inputs send.
fn parse_optional_due_date(raw: &str) -> Result<Option<chrono::DateTime<chrono::Utc>>, Error> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_due_date(raw).map(Some).map_err(map_task_validation_error)
}

pub(crate) fn parse_create_request(payload: CreateTaskRequest) -> Result<NewTask, Error> {
    let text = payload
        .text
        .ok_or_else(|| missing_field_error(FieldName::new("text")))?;
    let mut task = NewTask::titled(TaskText::new(text).map_err(map_task_validation_error)?);
    if let Some(description) = payload.description {
        task.description = description;
    }
    if let Some(status) = payload.status.as_deref() {
        task.status = parse_status(status)?;
    }
    if let Some(priority) = payload.priority.as_deref() {
        task.priority = parse_priority(priority)?;
    }
    if let Some(due_date) = payload.due_date.as_deref() {
        task.due_date = parse_optional_due_date(due_date)?;
    }
    if let Some(categories) = payload.categories {
        task.categories = normalize_categories(categories);
    }
    Ok(task)
}

pub(crate) fn parse_update_request(payload: UpdateTaskRequest) -> Result<TaskPatch, Error> {
    Ok(TaskPatch {
        text: payload
            .text
            .map(TaskText::new)
            .transpose()
            .map_err(map_task_validation_error)?,
        description: payload.description,
        status: payload.status.as_deref().map(parse_status).transpose()?,
        priority: payload.priority.as_deref().map(parse_priority).transpose()?,
        due_date: match payload.due_date {
            None => None,
            Some(None) => Some(None),
            Some(Some(raw)) => Some(parse_optional_due_date(&raw)?),
        },
        categories: payload.categories.map(normalize_categories),
    })
}
