//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every handler from the inbound layer (users, tasks, health)
//! - **Schemas**: wrappers such as [`ErrorSchema`] and [`TaskSchema`] that
//!   describe domain types without coupling them to utoipa, plus the request
//!   and response DTOs
//! - **Security**: bearer token authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, TaskSchema, TaskStatsSchema, UserSettingsSchema,
};
use crate::inbound::http::tasks_dto::{CreateTaskRequest, DeleteTaskResponse, UpdateTaskRequest};
use crate::inbound::http::users::{
    CredentialsRequest, LoginResponse, RegisterResponse, SettingsRequest, SettingsResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some("Access token issued by POST /api/v1/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Taskdeck API",
        description = "Personal task management: accounts, tasks, statistics and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::update_settings,
        crate::inbound::http::tasks::list_tasks,
        crate::inbound::http::tasks::create_task,
        crate::inbound::http::tasks::update_task,
        crate::inbound::http::tasks::delete_task,
        crate::inbound::http::tasks::task_stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        TaskSchema,
        TaskStatsSchema,
        UserSettingsSchema,
        CredentialsRequest,
        RegisterResponse,
        LoginResponse,
        SettingsRequest,
        SettingsResponse,
        CreateTaskRequest,
        UpdateTaskRequest,
        DeleteTaskResponse,
    )),
    tags(
        (name = "users", description = "Registration, login and user settings"),
        (name = "tasks", description = "Task management and statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
