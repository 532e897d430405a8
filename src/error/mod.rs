use actix_web::{HttpResponse, error::ResponseError, http::StatusCode};
use serde::Serialize;
use sqlx::error::Error as SqlxError;
use std::error::Error as StdError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Database(String),
    Internal(String),
    /// No usable credential was presented. The gate collapses every
    /// token-level failure into this one outcome; callers must not depend
    /// on finer distinctions.
    NotAuthenticated,
    Forbidden(String),
    NotFound(String),
    Validation(String),
    Conflict(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "{}", e),
            AppError::Internal(e) => write!(f, "{}", e),
            AppError::NotAuthenticated => write!(f, "Não autenticado"),
            AppError::Forbidden(e) => write!(f, "{}", e),
            AppError::NotFound(e) => write!(f, "{}", e),
            AppError::Validation(e) => write!(f, "{}", e),
            AppError::Conflict(e) => write!(f, "{}", e),
        }
    }
}

impl StdError for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

impl From<SqlxError> for AppError {
    fn from(error: SqlxError) -> Self {
        match error {
            SqlxError::RowNotFound => AppError::NotFound("Registro não encontrado".to_string()),
            _ => AppError::Database(error.to_string()),
        }
    }
}

/// Maps a storage failure to the terse user-facing message an endpoint
/// exposes, logging the detail. `NotFound` passes through untouched so
/// existence checks keep their own status.
pub fn storage_context(message: &'static str) -> impl FnOnce(AppError) -> AppError {
    move |err| match err {
        AppError::NotFound(_) => err,
        other => {
            log::error!("{}: {}", message, other);
            AppError::Database(message.to_string())
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
