//! Mapping of bracket errors onto HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use imagebracket_engine::BracketError;
use thiserror::Error;
use tracing::warn;

use crate::ErrorResponse;

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Bracket(#[from] BracketError),

    /// The request body was missing or not valid JSON for the endpoint.
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),

    /// The blocking task running the request panicked or was cancelled.
    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Bracket(BracketError::MatchNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Bracket(
                BracketError::InvalidEntrantCount(_)
                | BracketError::InvalidIdentifier(_)
                | BracketError::IncompleteMatch(_)
                | BracketError::MatchAlreadyDecided(_)
                | BracketError::InvalidWinner { .. }
                | BracketError::UploadLimitExceeded { .. },
            ) => StatusCode::BAD_REQUEST,
            Self::Body(rejection) => rejection.status(),
            Self::Bracket(BracketError::Storage(_)) | Self::Worker(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed: {}", self);
        }
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
