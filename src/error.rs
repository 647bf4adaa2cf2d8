//! Common error type and alias shared by the library, handlers, and binaries.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// The request is missing required input the client can correct.
    #[error("{0}")]
    Validation(String),
    /// A server-side secret or setting is absent.
    #[error("{0}")]
    Config(String),
    /// The text provider returned something other than the expected JSON.
    #[error("{0}")]
    Parse(String),
    /// An image provider rejected the request or returned no usable result.
    #[error("{0}")]
    Provider(String),
    /// A provider endpoint answered with a non-success status.
    #[error("{0}")]
    Upstream(String),
    #[error(transparent)]
    HttpClient(#[from] reqwest::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Provider(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Parse(_)
            | AppError::Upstream(_)
            | AppError::HttpClient(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_provider_map_to_400() {
        assert_eq!(
            AppError::Validation("missing".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Provider("rejected".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn config_parse_and_upstream_map_to_500() {
        assert_eq!(
            AppError::Config("no key".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Parse("bad json".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Upstream("status 503".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
