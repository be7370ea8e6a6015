use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use super::store::StoreError;

/// Failure taxonomy shared by every portal operation. Responses stay
/// generic: a denied request never learns which rule failed, and a missing
/// record is indistinguishable from a missing file.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("record not found")]
    NotFound,
    #[error("access denied")]
    Forbidden,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("file storage failure")]
    Storage(#[source] std::io::Error),
    #[error("persistence failure")]
    Persistence(#[source] StoreError),
}

impl From<StoreError> for PortalError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => PortalError::NotFound,
            StoreError::Conflict => PortalError::Validation("record already exists".to_string()),
            other @ StoreError::Unavailable(_) => PortalError::Persistence(other),
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            PortalError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            PortalError::Forbidden => (StatusCode::FORBIDDEN, "forbidden".to_string()),
            PortalError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid credentials".to_string())
            }
            PortalError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            PortalError::Storage(_) | PortalError::Persistence(_) => {
                tracing::error!(error = %self, "portal request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
