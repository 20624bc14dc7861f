//! Errors surfaced by the task API client.

use crate::domain::{ErrorCode, TaskId};

/// Failure talking to the task service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// The request never produced an HTTP response.
    #[error("transport failure: {message}")]
    Transport { message: String },
    /// The request exceeded the configured timeout.
    #[error("request timed out: {message}")]
    Timeout { message: String },
    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Api {
        status: u16,
        code: Option<ErrorCode>,
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("invalid response payload: {message}")]
    Decode { message: String },
    /// The base URL cannot address the API.
    #[error("invalid base URL: {message}")]
    Url { message: String },
    /// A mutation referenced a task absent from the current snapshot.
    #[error("task {id} is not in the current snapshot")]
    UnknownTask { id: TaskId },
}

impl ClientError {
    /// Domain error code reported by the server, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Api { code, .. } => *code,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                message: error.to_string(),
            }
        } else if error.is_decode() {
            Self::Decode {
                message: error.to_string(),
            }
        } else {
            Self::Transport {
                message: error.to_string(),
            }
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(error: url::ParseError) -> Self {
        Self::Url {
            message: error.to_string(),
        }
    }
}
