//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state, e.g. a taken username.
    #[schema(rename = "conflict")]
    Conflict,
    /// The task store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "text must not be empty")]
    message: String,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(example = "4a1f0c7e-2b3d-4e5f-8a9b-0c1d2e3f4a5b")]
    trace_id: Option<String>,
    /// Supplementary details; validation failures carry `{field, code}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Task`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Task, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct TaskSchema {
    #[schema(example = "7d3f1c2e-9b8a-4c5d-8e6f-0a1b2c3d4e5f")]
    id: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    owner_id: String,
    #[schema(example = "Buy milk")]
    text: String,
    description: String,
    #[schema(example = "pending")]
    status: String,
    #[schema(example = "medium")]
    priority: String,
    #[schema(value_type = Option<String>, format = DateTime)]
    due_date: Option<String>,
    categories: Vec<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::TaskStats`].
#[derive(ToSchema)]
#[schema(as = crate::domain::TaskStats, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct TaskStatsSchema {
    total: u64,
    completed: u64,
    pending: u64,
    high_priority: u64,
    /// Pending tasks whose due date has passed.
    overdue: u64,
}

/// OpenAPI schema for [`crate::domain::UserSettings`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserSettings, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSettingsSchema {
    #[schema(example = "light")]
    theme: String,
    #[schema(example = "list")]
    default_view: String,
}
