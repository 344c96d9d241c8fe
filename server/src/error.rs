use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sharecab::ShareCabError;
use tracing::error;

/// Maps library errors onto HTTP status codes.
#[derive(Debug)]
pub struct ApiError(pub ShareCabError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            ShareCabError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ShareCabError::NotFound(_) => StatusCode::NOT_FOUND,
            ShareCabError::InvalidTransition { .. } | ShareCabError::AlreadyTracked(_) => {
                StatusCode::CONFLICT
            }
            ShareCabError::SessionClosed => StatusCode::GONE,
            ShareCabError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ShareCabError> for ApiError {
    fn from(e: ShareCabError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
