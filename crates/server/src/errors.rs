use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use serde::{Deserialize, Serialize};
use service::errors::ServiceError;
use tracing::error;
use utoipa::ToSchema;

/// JSON body returned for every handled failure.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub status: u16,
    /// Reason phrase of `status`, e.g. "Not Found".
    pub error: String,
    pub message: String,
    /// Request path without query string.
    pub path: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub path: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self { status, message: message.into(), path: path.into() }
    }

    /// Map a service failure onto 400/404/500. The error text is passed through as `message`.
    pub fn from_service(err: ServiceError, path: &str) -> Self {
        let (status, message) = match err {
            ServiceError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ServiceError::Validation(m) | ServiceError::Model(ModelError::Validation(m)) => (StatusCode::BAD_REQUEST, m),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };
        Self::new(status, message, path)
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            status: self.status.as_u16(),
            error: self.status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: self.message.clone(),
            path: self.path.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), path = %self.path, error = %self.message, "request failed");
        }
        (self.status, Json(self.body())).into_response()
    }
}
