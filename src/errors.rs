//! Unified application error type.
//! All modules (db, core, api, export) return AppError to keep error
//! handling consistent; every failure stays local to the request that
//! triggered it.

use std::io;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / storage
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Request-level failures
    // ---------------------------
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Badge not recognized")]
    UnknownBadge,

    #[error("Confirmation phrase mismatch")]
    ConfirmationMismatch,

    // ---------------------------
    // Data exchange
    // ---------------------------
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) | AppError::ConfirmationMismatch | AppError::Import(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::UnknownBadge => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Storage and internal failures stay generic on the wire; the
        // detail goes to the log.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {}", self);
            return (status, "Internal error".to_string()).into_response();
        }

        (status, self.to_string()).into_response()
    }
}
