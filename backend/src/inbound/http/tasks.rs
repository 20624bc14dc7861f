//! Task HTTP handlers.
//!
//! ```text
//! GET    /api/v1/tasks?search=&status=&priority=&category=&sortBy=
//! POST   /api/v1/tasks
//! PATCH  /api/v1/tasks/{id}
//! DELETE /api/v1/tasks/{id}
//! GET    /api/v1/tasks/stats
//! ```
//!
//! Every route requires a bearer token; the task set is always scoped to the
//! authenticated caller.

use actix_web::{delete, get, patch, post, web};

use crate::domain::{Task, TaskStats};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::schemas::{ErrorSchema, TaskSchema, TaskStatsSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tasks_dto::{
    CreateTaskRequest, DeleteTaskResponse, TaskListQuery, UpdateTaskRequest,
    parse_create_request, parse_update_request,
};
use crate::inbound::http::validation::parse_task_id;

/// List the caller's tasks, filtered and sorted.
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    params(TaskListQuery),
    responses(
        (status = 200, description = "Matching tasks", body = [TaskSchema]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "listTasks"
)]
#[get("/tasks")]
pub async fn list_tasks(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    query: web::Query<TaskListQuery>,
) -> ApiResult<web::Json<Vec<Task>>> {
    let (filter, sort) = query.parse()?;
    let tasks = state
        .tasks_query
        .list(identity.user_id(), &filter, sort)
        .await?;
    Ok(web::Json(tasks))
}

/// Create a task owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 200, description = "Created task", body = TaskSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "createTask"
)]
#[post("/tasks")]
pub async fn create_task(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    payload: web::Json<CreateTaskRequest>,
) -> ApiResult<web::Json<Task>> {
    let new_task = parse_create_request(payload.into_inner())?;
    let task = state.tasks.create(identity.user_id(), new_task).await?;
    Ok(web::Json(task))
}

/// Apply a partial update to one of the caller's tasks.
#[utoipa::path(
    patch,
    path = "/api/v1/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Updated task", body = TaskSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Task not found", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "updateTask"
)]
#[patch("/tasks/{id}")]
pub async fn update_task(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<String>,
    payload: web::Json<UpdateTaskRequest>,
) -> ApiResult<web::Json<Task>> {
    let id = parse_task_id(&path)?;
    let patch = parse_update_request(payload.into_inner())?;
    let task = state.tasks.update(identity.user_id(), &id, patch).await?;
    Ok(web::Json(task))
}

/// Delete one of the caller's tasks.
#[utoipa::path(
    delete,
    path = "/api/v1/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task deleted", body = DeleteTaskResponse),
        (status = 400, description = "Invalid task id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Task not found", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask"
)]
#[delete("/tasks/{id}")]
pub async fn delete_task(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteTaskResponse>> {
    let id = parse_task_id(&path)?;
    state.tasks.delete(identity.user_id(), &id).await?;
    Ok(web::Json(DeleteTaskResponse {
        id: id.to_string(),
        message: "Task deleted successfully".to_owned(),
    }))
}

/// Aggregate counters over the caller's tasks.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/stats",
    responses(
        (status = 200, description = "Task statistics", body = TaskStatsSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "taskStats"
)]
#[get("/tasks/stats")]
pub async fn task_stats(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
) -> ApiResult<web::Json<TaskStats>> {
    let stats = state.tasks_query.stats(identity.user_id()).await?;
    Ok(web::Json(stats))
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
