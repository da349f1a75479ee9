//! User collection and item handlers

use crate::api::error::ApiError;
use crate::api::{controls, created_at, mason_response, replaced_at, require_json};
use crate::db::StoreError;
use crate::mason::{Control, DocumentBuilder, USER_PROFILE};
use crate::schema;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct UserBody {
    username: String,
    email: String,
    password: String,
}

/// Deserialize a schema-validated document into typed fields
fn user_body(doc: Value) -> Result<UserBody, ApiError> {
    serde_json::from_value(doc).map_err(|err| ApiError::invalid_document(err.to_string()))
}

/// GET /api/users/
pub async fn user_collection(State(state): State<AppState>) -> Result<Response, ApiError> {
    let users = state.store.list_users().await?;

    let mut body = DocumentBuilder::new();
    controls::add_namespace(&mut body);
    controls::users_all(&mut body, "self");
    controls::albums_all(&mut body, "spinrate:albums-all");
    controls::reviews_all(&mut body, "spinrate:reviews-all");
    controls::add_user(&mut body);

    let items: Vec<Value> = users
        .iter()
        .map(|user| {
            let mut item = DocumentBuilder::new().field("username", json!(user.username));
            item.add_control("self", Control::new(controls::user_url(&user.username)));
            item.add_control("profile", Control::new(USER_PROFILE));
            item.build()
        })
        .collect();
    body.set_field("items", json!(items));

    Ok(mason_response(StatusCode::OK, body.build()))
}

/// POST /api/users/
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Bytes,
) -> Result<Response, ApiError> {
    let doc = require_json(&headers, &payload)?;
    schema::validate_user(&doc).map_err(ApiError::invalid_document)?;
    let body = user_body(doc)?;

    let username = body.username.to_lowercase();

    if state.store.username_taken(&username).await? {
        return Err(ApiError::already_exists(format!(
            "User with username \"{}\" already exists",
            username
        )));
    }
    if state.store.email_taken(&body.email).await? {
        return Err(ApiError::already_exists(format!(
            "User with email \"{}\" already exists",
            body.email
        )));
    }

    match state
        .store
        .create_user(&username, &body.email, &body.password)
        .await
    {
        Ok(_) => Ok(created_at(controls::user_url(&username))),
        Err(StoreError::Conflict) => Err(ApiError::unexpected_conflict()),
        Err(err) => Err(err.into()),
    }
}

/// GET /api/users/:user/
pub async fn user_item(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Response, ApiError> {
    let db_user = state
        .store
        .user_by_username(&user)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let mut body = DocumentBuilder::new()
        .field("username", json!(db_user.username))
        .field("email", json!(db_user.email));
    controls::add_namespace(&mut body);
    body.add_control("self", Control::new(controls::user_url(&db_user.username)));
    body.add_control("profile", Control::new(USER_PROFILE));
    controls::users_all(&mut body, "collection");
    controls::reviews_by(&mut body, &db_user.username);
    controls::edit_user(&mut body, &db_user.username);
    controls::delete_user(&mut body, &db_user.username);

    Ok(mason_response(StatusCode::OK, body.build()))
}

/// PUT /api/users/:user/
pub async fn update_user(
    State(state): State<AppState>,
    Path(user): Path<String>,
    headers: HeaderMap,
    payload: Bytes,
) -> Result<Response, ApiError> {
    let doc = require_json(&headers, &payload)?;
    schema::validate_user(&doc).map_err(ApiError::invalid_document)?;
    let body = user_body(doc)?;

    let db_user = state
        .store
        .user_by_username(&user)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let username = body.username.to_lowercase();

    // The new natural key may collide with any row but this one
    if username != db_user.username && state.store.username_taken(&username).await? {
        return Err(ApiError::already_exists(format!(
            "User with username \"{}\" already exists",
            username
        )));
    }
    if body.email != db_user.email && state.store.email_taken(&body.email).await? {
        return Err(ApiError::already_exists(format!(
            "User with email \"{}\" already exists",
            body.email
        )));
    }

    match state
        .store
        .update_user(db_user.id, &username, &body.email, &body.password)
        .await
    {
        Ok(()) => Ok(replaced_at(controls::user_url(&username))),
        Err(StoreError::Conflict) => Err(ApiError::unexpected_conflict()),
        Err(err) => Err(err.into()),
    }
}

/// DELETE /api/users/:user/
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Response, ApiError> {
    let db_user = state
        .store
        .user_by_username(&user)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    state.store.delete_user(db_user.id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
