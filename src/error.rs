use crate::constants::UNKNOWN_ERROR;
use axum::{
    extract::rejection::QueryRejection,
    http::{header::InvalidHeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

/// A proxied call to HubSpot that did not succeed.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// HubSpot answered with a non-2xx status.
    #[error("upstream responded with {status}")]
    Status {
        status: StatusCode,
        payload: Option<Value>,
    },

    /// No response at all: connect failure, reset, unreadable success body.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl UpstreamError {
    pub fn status(&self) -> StatusCode {
        match self {
            UpstreamError::Status { status, .. } => *status,
            UpstreamError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The value placed under `error` in the response body.
    pub fn payload(&self) -> Value {
        match self {
            UpstreamError::Status {
                payload: Some(payload),
                ..
            } => payload.clone(),
            _ => Value::String(UNKNOWN_ERROR.to_string()),
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("Invalid query string: {0}")]
    InvalidQuery(#[from] QueryRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, payload) = match &self {
            AppError::Upstream(err) => {
                match err {
                    UpstreamError::Status { payload, .. } => {
                        error!(status = %err.status(), payload = ?payload, "Upstream error");
                    }
                    UpstreamError::Transport(source) => {
                        error!(error = %source, "Upstream unreachable");
                    }
                }
                (err.status(), err.payload())
            }
            AppError::InvalidBody(err) => {
                error!("Invalid request body: {}", err);
                let message = format!("Failed to parse the request body as JSON: {}", err);
                (StatusCode::BAD_REQUEST, Value::String(message))
            }
            AppError::InvalidQuery(rejection) => {
                error!("Invalid query string: {}", rejection.body_text());
                (rejection.status(), Value::String(rejection.body_text()))
            }
        };

        (status, Json(json!({ "error": payload }))).into_response()
    }
}

/// Startup failures. Any of these aborts the process before it binds.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),

    #[error("access token is not a valid header value")]
    InvalidToken(#[from] InvalidHeaderValue),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
