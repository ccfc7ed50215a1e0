use crate::domain::a001_chat::service::ChatError;
use crate::shared::llm::LlmError;
use crate::shared::uploads::UploadError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::error::ErrorBody;
use thiserror::Error;

pub const CHAT_FAILURE: &str = "An error occurred while processing your request.";
pub const IMAGE_FAILURE: &str = "An error occurred while generating the image.";

/// Ошибка на границе HTTP
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Image(#[from] LlmError),

    /// Слишком много файлов или битое multipart-тело
    #[error("{message}")]
    BadRequest { status: StatusCode, message: String },

    #[error("Failed to store upload: {0}")]
    Storage(#[source] std::io::Error),
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Io(e) => ApiError::Storage(e),
            UploadError::Multipart(e) => ApiError::BadRequest {
                status: e.status(),
                message: e.body_text(),
            },
            other @ UploadError::TooManyFiles { .. } => ApiError::BadRequest {
                status: StatusCode::BAD_REQUEST,
                message: other.to_string(),
            },
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { status, .. } => *status,
            ApiError::Chat(_) | ApiError::Image(_) | ApiError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            ApiError::Image(_) => IMAGE_FAILURE,
            ApiError::Chat(_) | ApiError::BadRequest { .. } | ApiError::Storage(_) => CHAT_FAILURE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::BadRequest { .. } => tracing::warn!("Rejected request: {}", self),
            ApiError::Image(_) => tracing::error!("Error generating image: {}", self),
            _ => tracing::error!("Error processing request: {}", self),
        }

        let body = ErrorBody::new(self.public_message(), self.to_string());
        (self.status_code(), Json(body)).into_response()
    }
}
