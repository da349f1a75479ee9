//! Album collection and item handlers

use crate::api::error::ApiError;
use crate::api::{controls, created_at, mason_response, require_json};
use crate::db::models::{Album, AlbumInput};
use crate::db::StoreError;
use crate::mason::{Control, DocumentBuilder, ALBUM_PROFILE};
use crate::validators::{format_date, format_time, parse_date, parse_time};
use crate::{schema, AppState};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct AlbumBody {
    unique_name: String,
    title: String,
    artist: String,
    release: Option<String>,
    duration: Option<String>,
    genre: Option<String>,
}

fn album_body(doc: Value) -> Result<AlbumBody, ApiError> {
    serde_json::from_value(doc).map_err(|err| ApiError::invalid_document(err.to_string()))
}

/// Turn a validated body into storage fields. The optional date and time
/// strings must parse; an unparseable value is a validation failure, never
/// silently dropped.
fn album_input(body: AlbumBody) -> Result<AlbumInput, ApiError> {
    let publication_date = match body.release.as_deref() {
        Some(raw) => Some(parse_date(raw).ok_or_else(|| {
            ApiError::validation(
                "Invalid release date",
                "The release date you provided is an invalid date",
            )
        })?),
        None => None,
    };
    let duration = match body.duration.as_deref() {
        Some(raw) => Some(parse_time(raw).ok_or_else(|| {
            ApiError::validation(
                "Invalid duration",
                "The album duration you provided is an invalid time",
            )
        })?),
        None => None,
    };

    Ok(AlbumInput {
        unique_name: body.unique_name.to_lowercase(),
        title: body.title,
        artist: body.artist,
        publication_date,
        duration,
        genre: body.genre,
    })
}

/// The album's own fields, shared by item and collection representations
fn album_fields(album: &Album) -> DocumentBuilder {
    DocumentBuilder::new()
        .field("unique_name", json!(album.unique_name))
        .field("title", json!(album.title))
        .field("artist", json!(album.artist))
        .field("release", json!(album.publication_date.map(format_date)))
        .field("duration", json!(album.duration.map(format_time)))
        .field("genre", json!(album.genre))
}

/// GET /api/albums/
pub async fn album_collection(State(state): State<AppState>) -> Result<Response, ApiError> {
    let albums = state.store.list_albums().await?;

    let mut body = DocumentBuilder::new();
    controls::add_namespace(&mut body);
    controls::albums_all(&mut body, "self");
    controls::users_all(&mut body, "spinrate:users-all");
    controls::reviews_all(&mut body, "spinrate:reviews-all");
    controls::add_album(&mut body);

    let items: Vec<Value> = albums
        .iter()
        .map(|album| {
            let mut item = album_fields(album);
            item.add_control("self", Control::new(controls::album_url(&album.unique_name)));
            item.add_control("profile", Control::new(ALBUM_PROFILE));
            item.build()
        })
        .collect();
    body.set_field("items", json!(items));

    Ok(mason_response(StatusCode::OK, body.build()))
}

/// POST /api/albums/
pub async fn create_album(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Bytes,
) -> Result<Response, ApiError> {
    let doc = require_json(&headers, &payload)?;
    schema::validate_album(&doc).map_err(ApiError::invalid_document)?;
    let input = album_input(album_body(doc)?)?;

    if state.store.unique_name_taken(&input.unique_name).await? {
        return Err(ApiError::already_exists(format!(
            "Unique name \"{}\" is already in use",
            input.unique_name
        )));
    }

    match state.store.create_album(&input).await {
        Ok(_) => Ok(created_at(controls::album_url(&input.unique_name))),
        // The (title, artist) pair is the constraint the pre-check cannot see
        Err(StoreError::Conflict) => Err(ApiError::already_exists(format!(
            "Album with title \"{}\" already exists with artist \"{}\"",
            input.title, input.artist
        ))),
        Err(err) => Err(err.into()),
    }
}

/// GET /api/albums/:album/
pub async fn album_item(
    State(state): State<AppState>,
    Path(album): Path<String>,
) -> Result<Response, ApiError> {
    let db_album = state
        .store
        .album_by_unique_name(&album)
        .await?
        .ok_or(ApiError::NotFound("Album"))?;

    let mut body = album_fields(&db_album);
    controls::add_namespace(&mut body);
    body.add_control("self", Control::new(controls::album_url(&db_album.unique_name)));
    body.add_control("profile", Control::new(ALBUM_PROFILE));
    controls::albums_all(&mut body, "collection");
    controls::reviews_for(&mut body, &db_album.unique_name);
    controls::edit_album(&mut body, &db_album.unique_name);
    controls::delete_album(&mut body, &db_album.unique_name);

    Ok(mason_response(StatusCode::OK, body.build()))
}

/// PUT /api/albums/:album/
pub async fn update_album(
    State(state): State<AppState>,
    Path(album): Path<String>,
    headers: HeaderMap,
    payload: Bytes,
) -> Result<Response, ApiError> {
    let doc = require_json(&headers, &payload)?;
    schema::validate_album(&doc).map_err(ApiError::invalid_document)?;
    let input = album_input(album_body(doc)?)?;

    let db_album = state
        .store
        .album_by_unique_name(&album)
        .await?
        .ok_or(ApiError::NotFound("Album"))?;

    if input.unique_name != db_album.unique_name
        && state.store.unique_name_taken(&input.unique_name).await?
    {
        return Err(ApiError::already_exists(format!(
            "Unique name \"{}\" is already in use",
            input.unique_name
        )));
    }

    match state.store.update_album(db_album.id, &input).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(StoreError::Conflict) => Err(ApiError::already_exists(format!(
            "Album with title \"{}\" already exists with artist \"{}\"",
            input.title, input.artist
        ))),
        Err(err) => Err(err.into()),
    }
}

/// DELETE /api/albums/:album/
pub async fn delete_album(
    State(state): State<AppState>,
    Path(album): Path<String>,
) -> Result<Response, ApiError> {
    let db_album = state
        .store
        .album_by_unique_name(&album)
        .await?
        .ok_or(ApiError::NotFound("Album"))?;

    state.store.delete_album(db_album.id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
