//! Account HTTP handlers.
//!
//! ```text
//! POST  /api/v1/register      {"username":"ada","password":"hunter22"}
//! POST  /api/v1/login         {"username":"ada","password":"hunter22"}
//! PATCH /api/v1/user/settings {"theme":"dark"}
//! ```

use actix_web::{patch, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{LoginCredentials, LoginValidationError, UserSettings, UserSettingsPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerIdentity;
use crate::inbound::http::schemas::{ErrorSchema, UserSettingsSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_login_validation_error;

/// Credentials body shared by `POST /register` and `POST /login`.
///
/// Example JSON:
/// `{"username":"ada","password":"hunter22"}`
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<CredentialsRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Response body for a successful registration.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
}

/// Response body for a successful login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    #[schema(value_type = UserSettingsSchema)]
    pub settings: UserSettings,
}

/// Partial settings update; omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    pub theme: Option<String>,
    pub default_view: Option<String>,
}

impl From<SettingsRequest> for UserSettingsPatch {
    fn from(value: SettingsRequest) -> Self {
        Self {
            theme: value.theme,
            default_view: value.default_view,
        }
    }
}

/// Response body for a settings update.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SettingsResponse {
    #[schema(value_type = UserSettingsSchema)]
    pub settings: UserSettings,
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username already taken", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<RegisterResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user = state.login.register(&credentials).await?;
    info!(user_id = %user.id(), "account registered");
    Ok(web::Json(RegisterResponse {
        message: "User registered successfully".to_owned(),
    }))
}

/// Authenticate and obtain a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let outcome = state.login.login(&credentials).await?;
    Ok(web::Json(LoginResponse {
        token: outcome.token.as_str().to_owned(),
        settings: outcome.settings,
    }))
}

/// Update the caller's display settings.
#[utoipa::path(
    patch,
    path = "/api/v1/user/settings",
    request_body = SettingsRequest,
    responses(
        (status = 200, description = "Updated settings", body = SettingsResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUserSettings"
)]
#[patch("/user/settings")]
pub async fn update_settings(
    state: web::Data<HttpState>,
    identity: BearerIdentity,
    payload: web::Json<SettingsRequest>,
) -> ApiResult<web::Json<SettingsResponse>> {
    let settings = state
        .settings
        .update_settings(identity.user_id(), payload.into_inner().into())
        .await?;
    Ok(web::Json(SettingsResponse { settings }))
}
