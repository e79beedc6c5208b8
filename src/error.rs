use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

/// Errors surfaced by request handlers.
///
/// Internal failures all collapse into one generic 500 body; the cause is
/// only written to the log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(errors) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid request",
                "details": errors,
            })),
            AppError::InvalidBody(reason) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid request",
                "details": reason,
            })),
            AppError::Storage(e) => {
                log::error!("{e:#}");
                HttpResponse::InternalServerError()
                    .json(serde_json::json!({ "error": "Server error" }))
            }
        }
    }
}
