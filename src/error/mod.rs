use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::error::Error as SqlxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: u16,
    pub message: String,
    pub error_type: String,
}

impl AppError {
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Database(_) => "storage_failure",
            AppError::Configuration(_) => "configuration_error",
        }
    }

    /// Message safe to hand back to an untrusted caller. Server-side failures
    /// are reduced to a fixed text; the detail only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) => "A storage error occurred while processing the request".to_string(),
            AppError::Configuration(_) => {
                "An internal error occurred while processing the request".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            log::error!("Request failed with {}: {}", status_code.as_u16(), self);
        } else {
            log::debug!("Request rejected with {}: {}", status_code.as_u16(), self);
        }

        let error_response = ErrorResponse {
            status: "error".to_string(),
            code: status_code.as_u16(),
            message: self.public_message(),
            error_type: self.error_type().to_string(),
        };

        HttpResponse::build(status_code).json(error_response)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SqlxError> for AppError {
    fn from(error: SqlxError) -> Self {
        match error {
            SqlxError::RowNotFound => AppError::NotFound("Record not found".to_string()),
            SqlxError::Database(ref db_error) if db_error.is_unique_violation() => {
                AppError::Conflict(db_error.message().to_string())
            }
            _ => AppError::Database(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        AppError::Database(format!("Migration failed: {}", error))
    }
}

pub type AppResult<T> = Result<T, AppError>;
