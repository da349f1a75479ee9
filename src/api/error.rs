//! Per-request error taxonomy
//!
//! Every `ApiError` renders as a Mason error document carrying `@error` and a
//! `profile` control, so clients parse error bodies with the same logic used
//! for success bodies. Store and filter errors convert in with sensible
//! defaults; handlers match explicitly where a more specific message applies.

use crate::api::mason_response;
use crate::db::StoreError;
use crate::filter::FilterError;
use crate::mason::{Control, DocumentBuilder, ERROR_PROFILE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    /// Request body missing or not JSON (415)
    MediaType,
    /// Schema or domain validation failure (400)
    Validation { title: String, detail: String },
    /// Referenced entity does not exist (404); carries the entity kind
    NotFound(&'static str),
    /// Uniqueness violation, pre-detected or caught at commit (409)
    Conflict { title: String, detail: String },
    /// Anything the client cannot fix (500)
    Internal(String),
}

impl ApiError {
    pub fn validation(title: &str, detail: impl Into<String>) -> Self {
        ApiError::Validation {
            title: title.to_string(),
            detail: detail.into(),
        }
    }

    pub fn invalid_document(detail: impl Into<String>) -> Self {
        Self::validation("Invalid JSON document", detail)
    }

    pub fn already_exists(detail: impl Into<String>) -> Self {
        ApiError::Conflict {
            title: "Already exists".to_string(),
            detail: detail.into(),
        }
    }

    pub fn conflict(title: &str, detail: impl Into<String>) -> Self {
        ApiError::Conflict {
            title: title.to_string(),
            detail: detail.into(),
        }
    }

    /// A constraint violation the pre-checks did not catch (lost race)
    pub fn unexpected_conflict() -> Self {
        Self::conflict(
            "Unexpected conflict",
            "An unexpected conflict happened while committing to the database",
        )
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError::Internal(detail.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // Late constraint violations mean a concurrent request won the
            // race between pre-check and commit.
            StoreError::Conflict | StoreError::ForeignKey => ApiError::unexpected_conflict(),
            StoreError::Invalid(detail) => ApiError::internal(detail),
            StoreError::Database(err) => {
                error!("store failure: {}", err);
                ApiError::internal(err.to_string())
            }
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        let detail = err.to_string();
        match err {
            FilterError::MissingSearchword => ApiError::validation("Searchword required", detail),
            FilterError::MalformedTimeframe(_) => {
                ApiError::validation("Incorrect timeframe format", detail)
            }
            FilterError::UnknownFilterField(_) | FilterError::BadLimit(_) => {
                ApiError::validation("Invalid query parameters", detail)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, title, detail) = match self {
            ApiError::MediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported media type".to_string(),
                Some("Use JSON".to_string()),
            ),
            ApiError::Validation { title, detail } => (StatusCode::BAD_REQUEST, title, Some(detail)),
            ApiError::NotFound(kind) => (StatusCode::NOT_FOUND, format!("{} not found", kind), None),
            ApiError::Conflict { title, detail } => (StatusCode::CONFLICT, title, Some(detail)),
            ApiError::Internal(detail) => {
                error!("internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(detail),
                )
            }
        };

        let mut body = DocumentBuilder::new();
        body.add_error(&title, detail.as_deref());
        body.add_control("profile", Control::new(ERROR_PROFILE));
        mason_response(status, body.build())
    }
}
