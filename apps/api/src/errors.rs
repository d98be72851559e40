use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::embedding::EmbeddingError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::UnprocessableEntity(_) | AppError::Extraction(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Multipart(e) => e.status(),
            AppError::Embedding(_) | AppError::Render(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message safe to show an end user. Server-side failures are logged, not echoed.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::UnprocessableEntity(msg)
            | AppError::Extraction(msg) => msg.clone(),
            AppError::Multipart(e) => e.body_text(),
            AppError::Embedding(e) => {
                tracing::error!("Embedding error: {e}");
                "The similarity model failed to process the documents".to_string()
            }
            AppError::Render(msg) => {
                tracing::error!("Render error: {msg}");
                "The results page could not be rendered".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::UnprocessableEntity(_) => "UNPROCESSABLE_ENTITY",
            AppError::Extraction(_) => "EXTRACTION_ERROR",
            AppError::Multipart(_) => "MULTIPART_ERROR",
            AppError::Embedding(_) => "EMBEDDING_ERROR",
            AppError::Render(_) => "RENDER_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<handlebars::RenderError> for AppError {
    fn from(e: handlebars::RenderError) -> Self {
        AppError::Render(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.public_message()
            }
        }));

        (status, body).into_response()
    }
}
