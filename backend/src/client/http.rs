//! Reqwest-backed adapter for the task REST API.
//!
//! This adapter owns transport details only: URL construction, bearer
//! headers, status mapping, and JSON decoding into domain types.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::domain::{
    Error as ApiError, NewTask, SortKey, Task, TaskFilter, TaskId, TaskPatch, TaskStats,
    UserSettings, UserSettingsPatch,
};

use super::{ClientError, TaskApi};

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const API_PREFIX: &str = "api/v1/";

/// Token and settings returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginSession {
    pub token: String,
    pub settings: UserSettings,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Deserialize)]
struct SettingsBody {
    settings: UserSettings,
}

/// HTTP client for one task service deployment.
#[derive(Clone)]
pub struct HttpTaskApi {
    client: Client,
    api_root: Url,
    token: Option<String>,
}

impl HttpTaskApi {
    /// Build a client rooted at `base_url` (e.g. `http://localhost:8080`).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Url`] when `base_url` cannot carry paths and
    /// [`ClientError::Transport`] when the reqwest client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }

    /// Like [`HttpTaskApi::new`] with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Same as [`HttpTaskApi::new`].
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_root: api_root(base_url)?,
            token: None,
        })
    }

    /// Attach the bearer token used for task and settings requests.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Bearer token attached to requests, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.api_root.join(path)?)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref()).map_err(|error| ClientError::Decode {
            message: error.to_string(),
        })
    }

    /// Create an account. Returns the server's confirmation message.
    pub async fn register(&self, username: &str, password: &str) -> Result<String, ClientError> {
        let request = self
            .client
            .post(self.endpoint("register")?)
            .json(&json!({ "username": username, "password": password }));
        let body: MessageBody = self.send(request).await?;
        Ok(body.message)
    }

    /// Exchange credentials for a bearer token and the stored settings.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginSession, ClientError> {
        let request = self
            .client
            .post(self.endpoint("login")?)
            .json(&json!({ "username": username, "password": password }));
        self.send(request).await
    }

    /// Apply a partial settings update and return the stored settings.
    pub async fn update_settings(
        &self,
        patch: &UserSettingsPatch,
    ) -> Result<UserSettings, ClientError> {
        let request = self
            .client
            .patch(self.endpoint("user/settings")?)
            .json(patch);
        let body: SettingsBody = self.send(request).await?;
        Ok(body.settings)
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list_tasks(
        &self,
        filter: &TaskFilter,
        sort: SortKey,
    ) -> Result<Vec<Task>, ClientError> {
        let request = self
            .client
            .get(self.endpoint("tasks")?)
            .query(&list_query(filter, sort));
        self.send(request).await
    }

    async fn stats(&self) -> Result<TaskStats, ClientError> {
        let request = self.client.get(self.endpoint("tasks/stats")?);
        self.send(request).await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ClientError> {
        let request = self.client.post(self.endpoint("tasks")?).json(task);
        self.send(request).await
    }

    async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ClientError> {
        let request = self
            .client
            .patch(self.endpoint(&format!("tasks/{id}"))?)
            .json(patch);
        self.send(request).await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ClientError> {
        let request = self.client.delete(self.endpoint(&format!("tasks/{id}"))?);
        let _: serde_json::Value = self.send(request).await?;
        Ok(())
    }
}

/// Resolve `<base>/api/v1/`, keeping any path prefix on the base URL.
fn api_root(base_url: &str) -> Result<Url, ClientError> {
    let mut base = Url::parse(base_url)?;
    if base.cannot_be_a_base() {
        return Err(ClientError::Url {
            message: format!("{base_url} cannot be a base URL"),
        });
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(API_PREFIX)?)
}

fn list_query(filter: &TaskFilter, sort: SortKey) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(5);
    if let Some(status) = filter.status {
        params.push(("status", status.as_str().to_owned()));
    }
    if let Some(priority) = filter.priority {
        params.push(("priority", priority.as_str().to_owned()));
    }
    if let Some(category) = &filter.category {
        params.push(("category", category.clone()));
    }
    if let Some(search) = &filter.search {
        params.push(("search", search.clone()));
    }
    params.push(("sortBy", sort.as_str().to_owned()));
    params
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ClientError {
    match serde_json::from_slice::<ApiError>(body) {
        Ok(error) => ClientError::Api {
            status: status.as_u16(),
            code: Some(error.code()),
            message: error.message().to_owned(),
        },
        Err(decode_error) => {
            debug!(error = %decode_error, "error body is not a domain error payload");
            ClientError::Api {
                status: status.as_u16(),
                code: None,
                message: body_preview(body),
            }
        }
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network helpers.

    use super::*;
    use crate::domain::{ErrorCode, TaskPriority, TaskStatus};
    use rstest::rstest;

    #[rstest]
    #[case("http://localhost:8080", "http://localhost:8080/api/v1/tasks")]
    #[case("http://localhost:8080/", "http://localhost:8080/api/v1/tasks")]
    #[case("https://example.test/deck", "https://example.test/deck/api/v1/tasks")]
    fn endpoints_keep_the_base_path(#[case] base: &str, #[case] expected: &str) {
        let api = HttpTaskApi::new(base).expect("client builds");
        assert_eq!(api.endpoint("tasks").expect("url").as_str(), expected);
    }

    #[rstest]
    #[case("not a url")]
    #[case("mailto:ops@example.test")]
    fn unusable_base_urls_are_rejected(#[case] base: &str) {
        assert!(matches!(
            HttpTaskApi::new(base),
            Err(ClientError::Url { .. })
        ));
    }

    #[rstest]
    fn list_query_only_sends_constrained_dimensions() {
        let filter = TaskFilter::default()
            .with_status(Some(TaskStatus::Completed))
            .with_priority(Some(TaskPriority::Low))
            .with_search(Some("shop".into()));
        assert_eq!(
            list_query(&filter, SortKey::DueDate),
            vec![
                ("status", "completed".to_owned()),
                ("priority", "low".to_owned()),
                ("search", "shop".to_owned()),
                ("sortBy", "dueDate".to_owned()),
            ]
        );
    }

    #[rstest]
    fn domain_error_bodies_keep_their_code() {
        let body = br#"{"code":"not_found","message":"task not found"}"#;
        let error = map_status_error(StatusCode::NOT_FOUND, body);
        assert_eq!(error.code(), Some(ErrorCode::NotFound));
        assert_eq!(
            error,
            ClientError::Api {
                status: 404,
                code: Some(ErrorCode::NotFound),
                message: "task not found".into(),
            }
        );
    }

    #[rstest]
    fn opaque_error_bodies_are_previewed() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"<html>\n  bad gateway\n</html>");
        assert_eq!(
            error,
            ClientError::Api {
                status: 502,
                code: None,
                message: "<html> bad gateway </html>".into(),
            }
        );
    }
}
