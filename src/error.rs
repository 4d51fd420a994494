use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application error kinds. Network-shaped variants are usually swallowed at the
/// adapter with a warning; only validation and storage errors reach the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),
    #[error("stored meal collection is corrupt")]
    StorageCorrupt(#[source] serde_json::Error),
    #[error("storage backend failed")]
    Storage(#[source] anyhow::Error),
    #[error("food service request failed: {0}")]
    Network(String),
    #[error("food service returned status {status}")]
    UpstreamStatus { status: u16, body: String },
    #[error("food service response could not be parsed")]
    UpstreamShape(#[source] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::EmptyInput(_) => StatusCode::BAD_REQUEST,
            AppError::StorageCorrupt(_) | AppError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Network(_)
            | AppError::UpstreamStatus { .. }
            | AppError::UpstreamShape(_) => StatusCode::BAD_GATEWAY,
        };
        (status, self.to_string()).into_response()
    }
}
