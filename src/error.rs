use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::automation::platform::PlatformError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Dispatcher busy: another action is still running after {waited_ms}ms")]
    DispatcherBusy { waited_ms: u64 },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Both a platform rejection and a dispatcher timeout count as a failed action
    pub fn is_action_failure(&self) -> bool {
        matches!(self, Self::ActionFailed(_) | Self::DispatcherBusy { .. })
    }
}

impl From<PlatformError> for AppError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::PermissionDenied(reason) => AppError::PermissionDenied(reason),
            PlatformError::Rejected(reason) => AppError::ActionFailed(reason),
            PlatformError::Unsupported => AppError::ActionFailed(err.to_string()),
            PlatformError::Unavailable(_) => AppError::Internal(anyhow::anyhow!(err)),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::InvalidParams(_) => (StatusCode::BAD_REQUEST, "Invalid Params"),
            AppError::ElementNotFound(_) => (StatusCode::NOT_FOUND, "Element Not Found"),
            AppError::PermissionDenied(_) => (StatusCode::FORBIDDEN, "Permission Denied"),
            AppError::ActionFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Action Failed"),
            AppError::DispatcherBusy { .. } => (StatusCode::SERVICE_UNAVAILABLE, "Dispatcher Busy"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Error"),
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
