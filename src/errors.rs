use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;
use crate::validation::FieldViolation;

pub const NOT_FOUND_DETAIL: &str = "Expense not found";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),
    #[error("expense not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Database(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Validation(violations) => json!({ "detail": violations }),
            ApiError::NotFound => json!({ "detail": NOT_FOUND_DETAIL }),
            ApiError::Internal(msg) => {
                error!(error = %msg, "request failed");
                json!({ "detail": "Internal Server Error" })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
