//! Error-to-response mapping for the sync endpoints.
//!
//! Handlers return [`AppError`] and axum turns it into a JSON body via
//! [`IntoResponse`]. Storage failures are logged server-side and kept
//! vague on the wire; a device cannot act on a SQL error anyway.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// The JSON body every failed request carries.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::Store(e) => {
                tracing::error!("Storage error: {:?}", e);
                ErrorResponse {
                    error: "Storage error".to_string(),
                    details: None,
                }
            }
            AppError::BadRequest(msg) => ErrorResponse {
                error: msg.clone(),
                details: None,
            },
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse {
                    error: "Internal server error".to_string(),
                    details: Some(msg.clone()),
                }
            }
        };

        (self.status(), Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
