use actix_web::error::{PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;

use crate::validation::ValidationErrors;

/// Every failure a handler can return. Rendered as
/// `{"success": false, "message": ..., "errors"?: {...}}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{}", .0.first_message().unwrap_or("The given data was invalid."))]
    Validation(ValidationErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("Unauthorized.")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation(ValidationErrors::single(field, message))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a ValidationErrors>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(DbErr::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Database(err) if constraint_violation(err).is_some() => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Database(_) | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let (message, errors) = match self {
            AppError::Validation(errors) => (self.to_string(), Some(errors)),
            AppError::Database(DbErr::RecordNotFound(what)) => (what.clone(), None),
            AppError::Database(err) => match constraint_violation(err) {
                Some(message) => (message.to_string(), None),
                None => {
                    tracing::error!(error = %err, "database failure");
                    ("Server error.".to_string(), None)
                }
            },
            AppError::Storage(err) => {
                tracing::error!(error = %err, "failed to store upload");
                ("Server error.".to_string(), None)
            }
            _ => (self.to_string(), None),
        };

        HttpResponse::build(status).json(ErrorBody {
            success: false,
            message,
            errors,
        })
    }
}

/// Malformed query strings (`?per_page=abc`) render as a 422 on the `query` field.
pub fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "rejected query string");
    AppError::invalid("query", format!("The query string is invalid: {err}")).into()
}

/// Path ids that don't parse as an id can't name a record.
pub fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "rejected path segment");
    AppError::not_found("Resource not found").into()
}

fn constraint_violation(err: &DbErr) -> Option<&'static str> {
    match err.sql_err()? {
        SqlErr::UniqueConstraintViolation(_) => Some("The record conflicts with an existing one."),
        SqlErr::ForeignKeyConstraintViolation(_) => Some("The referenced record does not exist."),
        _ => None,
    }
}
