use std::io::Error as IoError;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

pub mod config;
pub mod repository;
pub mod service;

pub use config::ConfigError;
pub use repository::RepositoryError;
pub use service::ServiceError;

use crate::db::DatabaseError;

#[derive(Debug, Error)]
pub enum AppError {
    // Request-level errors
    #[error("{0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
    // Infrastructure/system errors
    #[error("Server error: {0}")]
    Server(#[from] IoError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Logger error: {0}")]
    Logger(String),
    #[error("Store connection error: {0}")]
    Store(String),
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<DatabaseError> for AppError {
    fn from(e: DatabaseError) -> Self {
        AppError::Store(e.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        if err.is_validation() {
            return AppError::Validation(err.to_string());
        }
        match err {
            ServiceError::NotFound => AppError::NotFound(err.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        // Flatten field errors into a single string
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let reasons = errs
                    .iter()
                    .map(|e| e.message.clone().unwrap_or_else(|| "invalid".into()))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: {}", field, reasons)
            })
            .collect::<Vec<_>>()
            .join("; ");
        AppError::Validation(message)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_)
            | AppError::Server(_)
            | AppError::Config(_)
            | AppError::Logger(_)
            | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Validation(message) => {
                HttpResponse::BadRequest().json(json!({ "error": message }))
            }
            AppError::NotFound(_) => HttpResponse::NotFound().finish(),
            _ => {
                // Details stay in the log, never in the response body
                error!("Request failed: {}", self);
                HttpResponse::build(self.status_code())
                    .json(json!({ "error": "internal server error" }))
            }
        }
    }
}
