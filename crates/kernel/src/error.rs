//! Application error types.
//!
//! Every failure leaves as `{"success": false, "error": "..."}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::providers::ProviderError;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    /// The envelope could not be parsed.
    #[error("{0}")]
    BadRequest(String),

    /// No provider is wired to this route.
    #[error("{0} not configured")]
    NotConfigured(&'static str),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Serialize)]
struct FailureBody {
    success: bool,
    error: String,
}

/// `{"success": true, "message": ...}`.
#[derive(Debug, Serialize)]
pub struct SuccessBody {
    pub success: bool,
    pub message: &'static str,
}

impl SuccessBody {
    pub fn new(message: &'static str) -> Json<Self> {
        Json(Self {
            success: true,
            message,
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) | AppError::NotConfigured(_) | AppError::Provider(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Provider text is passed through so the caller sees why a delivery
        // failed; internal errors stay vague.
        let error = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        (
            status,
            Json(FailureBody {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
