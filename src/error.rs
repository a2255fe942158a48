use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::models::Envelope;
use crate::validation::FieldErrors;

pub const MISSING_TOKEN_MESSAGE: &str = "Authorization token is missing";
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authorization token is missing")]
    MissingToken,

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The backend answered with a non-2xx status.
    #[error("Backend error {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    InternalServerError,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                Envelope::<()>::failure(MISSING_TOKEN_MESSAGE),
            ),
            AppError::Validation(errors) => {
                let mut body = Envelope::<()>::failure(errors.summary());
                body.errors = Some(errors.into_map());
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Envelope::failure(msg)),
            AppError::Upstream { status, message } => (status, Envelope::failure(message)),
            AppError::Transport(e) => {
                error!("backend transport error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::failure(GENERIC_FAILURE_MESSAGE),
                )
            }
            AppError::Config(msg) => {
                error!("configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::failure(GENERIC_FAILURE_MESSAGE),
                )
            }
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Envelope::failure(GENERIC_FAILURE_MESSAGE),
            ),
        };

        (status, Json(body)).into_response()
    }
}
