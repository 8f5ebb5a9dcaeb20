use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use std::fmt;

use crate::utils::validation::Violation;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    FileRejected { field: String, message: String },
    Validation(Vec<Violation>),
    NotFound(String),
    DatabaseError(sqlx::Error),
    IoError(std::io::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<Violation>,
}

impl ErrorResponse {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            field: None,
            details: Vec::new(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::FileRejected { field, message } => {
                write!(f, "File Rejected: {} ({})", message, field)
            }
            AppError::Validation(violations) => {
                write!(f, "Validation Failed: {} violation(s)", violations.len())
            }
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DatabaseError(err) => write!(f, "Database Error: {}", err),
            AppError::IoError(err) => write!(f, "IO Error: {}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::FileRejected { .. } | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) => ErrorResponse::message(msg.clone()),
            AppError::FileRejected { field, message } => ErrorResponse {
                error: message.clone(),
                field: Some(field.clone()),
                details: Vec::new(),
            },
            AppError::Validation(violations) => ErrorResponse {
                error: "Validation failed".to_string(),
                field: None,
                details: violations.clone(),
            },
            AppError::DatabaseError(err) => {
                error!("Database error: {:?}", err);
                ErrorResponse::message("Database operation failed")
            }
            AppError::IoError(err) => {
                error!("Filesystem error: {:?}", err);
                ErrorResponse::message("File storage error")
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(crate::utils::validation::collect_violations(None, &errors))
    }
}
