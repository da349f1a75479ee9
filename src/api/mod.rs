//! HTTP API handlers and shared request/response plumbing

pub mod albums;
pub mod controls;
pub mod entry;
pub mod error;
pub mod health;
pub mod reviews;
pub mod users;

pub use albums::{album_collection, album_item, create_album, delete_album, update_album};
pub use entry::entry_point;
pub use error::ApiError;
pub use health::health;
pub use reviews::{
    create_review, delete_review, review_collection, review_item, reviews_by_album,
    reviews_by_user, update_review,
};
pub use users::{create_user, delete_user, update_user, user_collection, user_item};

use crate::mason::MASON;
use axum::body::Bytes;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

/// Serialize a Mason document as the response body
pub(crate) fn mason_response(status: StatusCode, body: Value) -> Response {
    (status, [(header::CONTENT_TYPE, MASON)], body.to_string()).into_response()
}

/// 201 with the new item's canonical URL
pub(crate) fn created_at(location: String) -> Response {
    (StatusCode::CREATED, [(header::LOCATION, location)]).into_response()
}

/// 204 with the (possibly moved) item's canonical URL
pub(crate) fn replaced_at(location: String) -> Response {
    (StatusCode::NO_CONTENT, [(header::LOCATION, location)]).into_response()
}

/// Extract a JSON document from a mutating request.
///
/// A missing or non-JSON content type, and a body that does not parse as
/// JSON, are both media-type failures (415), not validation failures.
pub(crate) fn require_json(headers: &HeaderMap, body: &Bytes) -> Result<Value, ApiError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().contains("json"))
        .unwrap_or(false);

    if !is_json {
        return Err(ApiError::MediaType);
    }

    serde_json::from_slice(body).map_err(|_| ApiError::MediaType)
}
