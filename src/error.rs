use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
};
use serde_json::json;
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("File processing error: {0}")]
    FileProcessing(String),
    #[error("Required sheet '{sheet}' not found (available: {})", .available.join(", "))]
    MissingSheet {
        sheet: String,
        available: Vec<String>,
    },
    #[error("Sheet '{sheet}' cannot be parsed: {message}")]
    SheetLayout {
        sheet: String,
        message: String,
    },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::FileProcessing(_) => StatusCode::BAD_REQUEST,
            AppError::MissingSheet { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::SheetLayout { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
