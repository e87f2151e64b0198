use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::db::StoreError;
use crate::validation::ValidationError;

/// Failures a request can end in. None of them leak detail to the client:
/// the response is a bare status code and the cause goes to the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid path parameter `{name}`: {value:?}")]
    InvalidParam { name: &'static str, value: String },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MalformedBody(_)
            | AppError::Validation(_)
            | AppError::InvalidParam { .. } => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, "Request rejected");
        }
        status.into_response()
    }
}
