use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::database::DatabaseError;
use crate::models::ValidationError;

/// Failure of a single request, rendered as `{message, error}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{context}: {detail}")]
    BadRequest { context: &'static str, detail: String },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{context}: {detail}")]
    Internal { context: &'static str, detail: String },
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    error: String,
}

impl ApiError {
    /// Map a storage failure, keeping NotFound distinct from everything else
    pub fn storage(context: &'static str) -> impl FnOnce(DatabaseError) -> ApiError {
        move |err| match err {
            DatabaseError::NotFound(kind) => ApiError::NotFound(kind),
            other => ApiError::Internal {
                context,
                detail: other.to_string(),
            },
        }
    }

    pub fn invalid(context: &'static str) -> impl FnOnce(ValidationError) -> ApiError {
        move |err| ApiError::BadRequest {
            context,
            detail: err.to_string(),
        }
    }

    pub fn rejected(context: &'static str) -> impl FnOnce(JsonRejection) -> ApiError {
        move |rejection| ApiError::BadRequest {
            context,
            detail: rejection.body_text(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::BadRequest { context, detail } => ErrorBody {
                message: context.to_string(),
                error: detail,
            },
            ApiError::NotFound(kind) => ErrorBody {
                message: format!("{} not found", kind),
                error: "not found".to_string(),
            },
            ApiError::Internal { context, detail } => {
                // Details stay in the log
                tracing::error!(%context, %detail, "request failed");
                ErrorBody {
                    message: context.to_string(),
                    error: "internal server error".to_string(),
                }
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_kept_apart_from_storage_failures() {
        let err = ApiError::storage("Error deleting task")(DatabaseError::NotFound("Task"));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = ApiError::storage("Error deleting task")(DatabaseError::LockPoisoned);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ApiError::invalid("Error creating task")(ValidationError::Required("title"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Error creating task: title is required");
    }
}
