use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

use crate::{
    media::MediaError,
    response::{ApiResponse, Meta},
    validation::{FieldError, ValidationErrors},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid input")]
    Validation(ValidationErrors),

    #[error("Invalid input")]
    Json(#[from] JsonRejection),

    #[error("Invalid input")]
    Query(#[from] QueryRejection),

    #[error("Invalid path parameter")]
    Path(#[from] PathRejection),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    OrmError(#[from] DbErr),

    #[error("Internal server error")]
    Media(#[from] MediaError),

    #[error("Upload failed")]
    Upload(#[source] MediaError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_)
            | AppError::Validation(_)
            | AppError::Json(_)
            | AppError::Query(_)
            | AppError::Path(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::OrmError(_)
            | AppError::Media(_)
            | AppError::Upload(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A unique-index violation becomes a 409 with `message`; any other store error stays a 500.
pub fn unique_conflict(err: DbErr, message: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(message.to_string()),
        _ => AppError::OrmError(err),
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Detail stays in the logs; clients only see the generic message.
        match &self {
            AppError::OrmError(err) => tracing::error!(error = %err, "database error"),
            AppError::Media(err) | AppError::Upload(err) => {
                tracing::error!(error = %err, "media host error")
            }
            AppError::Internal(err) => tracing::error!(error = ?err, "internal error"),
            AppError::Json(err) => tracing::debug!(error = %err, "rejected request body"),
            _ => {}
        }

        let message = self.to_string();
        let errors = match self {
            AppError::Validation(errors) => Some(errors.into_inner()),
            _ => None,
        };

        let body = ApiResponse {
            message: message.clone(),
            data: Some(ErrorData {
                error: message,
                errors,
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
