//! API entry point
//!
//! `GET /api/` returns no fields of its own, just the controls from which a
//! client can discover the three top-level collections.

use crate::api::{controls, mason_response};
use axum::http::StatusCode;
use axum::response::Response;

pub async fn entry_point() -> Response {
    let mut body = crate::mason::DocumentBuilder::new();
    controls::add_namespace(&mut body);
    controls::users_all(&mut body, "spinrate:users-all");
    controls::albums_all(&mut body, "spinrate:albums-all");
    controls::reviews_all(&mut body, "spinrate:reviews-all");

    mason_response(StatusCode::OK, body.build())
}
