//! # Error Handling
//!
//! Every failure in a request is caught at the handler boundary and rendered as
//! `{"detail": "<message>"}`. Callers tell error kinds apart only by status code:
//!
//! | Variant | Status | When |
//! |---|---|---|
//! | `Config` | 500 | provider credential missing |
//! | `EmptyTranscript` | 400 | provider returned blank text |
//! | `BadRequest` | 400 | upload has no `audio` field |
//! | `Internal` | 500 | anything else (network, provider, multipart) |

use actix_multipart::MultipartError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt::Display;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required configuration is missing at request time
    #[error("{0}")]
    Config(String),

    /// The provider answered but produced no usable speech
    #[error("{0}")]
    EmptyTranscript(String),

    /// Client sent a request we cannot act on
    #[error("{0}")]
    BadRequest(String),

    /// Unclassified runtime or provider failure
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Log an unclassified failure and turn it into a 500 carrying its message.
    pub fn unexpected(err: impl Display) -> Self {
        error!(error = %err, "Error transcribing audio");
        AppError::Internal(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::EmptyTranscript(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "detail": self.to_string()
        }))
    }
}

/// Failures talking to the external transcription provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Request never got a response (DNS, TLS, connection reset, ...)
    #[error("Failed to reach transcription provider: {0}")]
    Connection(String),

    /// Provider answered with a non-success status
    #[error("Transcription provider error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Request could not be built from the upload
    #[error("Invalid transcription request: {0}")]
    InvalidRequest(String),

    /// Success status but an unreadable body
    #[error("Failed to decode transcription response: {0}")]
    Decode(String),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::unexpected(err)
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::unexpected(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;
