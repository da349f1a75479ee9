//! Review handlers: the global filterable collection, the per-album and
//! per-user sub-collections, and the review item

use crate::api::error::ApiError;
use crate::api::{controls, created_at, mason_response, replaced_at, require_json};
use crate::db::models::{ReviewInput, ReviewListing};
use crate::db::{Store, StoreError};
use crate::filter::{ReviewFilter, ReviewQuery};
use crate::mason::{Control, DocumentBuilder, REVIEW_PROFILE};
use crate::validators::{format_datetime, new_identifier};
use crate::{schema, AppState};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::{json, Value};

/// Attempts at deriving an unused identifier before giving up. Collisions
/// require two submissions within the same microsecond, so more than one
/// round is already pathological.
const IDENTIFIER_ATTEMPTS: u32 = 5;

#[derive(Debug, Deserialize)]
struct ReviewBody {
    user: String,
    title: String,
    content: String,
    star_rating: i64,
}

fn review_body(doc: Value) -> Result<ReviewBody, ApiError> {
    serde_json::from_value(doc).map_err(|err| ApiError::invalid_document(err.to_string()))
}

/// Derive a review identifier confirmed unused in the store
async fn fresh_review_identifier(store: &Store) -> Result<(String, NaiveDateTime), ApiError> {
    for _ in 0..IDENTIFIER_ATTEMPTS {
        let (identifier, submitted) = new_identifier("review_");
        if !store.review_identifier_exists(&identifier).await? {
            return Ok((identifier, submitted));
        }
    }
    Err(ApiError::internal(
        "could not derive an unused review identifier",
    ))
}

/// A review entry in a collection document. The sub-collections omit the
/// field their URL already fixes (`user` under a user, `album` under an
/// album); full content is only on the item resource.
fn listing_item(review: &ReviewListing, with_user: bool, with_album: bool) -> Value {
    let mut item = DocumentBuilder::new().field("identifier", json!(review.identifier));
    if with_user {
        item.set_field("user", json!(review.username));
    }
    if with_album {
        item.set_field("album", json!(review.album_title));
    }
    item.set_field("title", json!(review.title));
    item.set_field("star_rating", json!(review.star_rating));
    item.set_field(
        "submission_date",
        json!(format_datetime(review.submission_date)),
    );
    item.add_control(
        "self",
        Control::new(controls::review_url(
            &review.album_unique_name,
            &review.identifier,
        )),
    );
    item.add_control("profile", Control::new(REVIEW_PROFILE));
    item.build()
}

/// GET /api/reviews/
pub async fn review_collection(
    State(state): State<AppState>,
    Query(query): Query<ReviewQuery>,
) -> Result<Response, ApiError> {
    let filter = ReviewFilter::from_query(&query)?;
    let reviews = state.store.reviews_filtered(&filter).await?;

    let mut body = DocumentBuilder::new();
    controls::add_namespace(&mut body);
    controls::reviews_all(&mut body, "self");
    controls::users_all(&mut body, "spinrate:users-all");
    controls::albums_all(&mut body, "spinrate:albums-all");

    let items: Vec<Value> = reviews
        .iter()
        .map(|review| listing_item(review, true, true))
        .collect();
    body.set_field("items", json!(items));

    Ok(mason_response(StatusCode::OK, body.build()))
}

/// GET /api/albums/:album/reviews/
pub async fn reviews_by_album(
    State(state): State<AppState>,
    Path(album): Path<String>,
) -> Result<Response, ApiError> {
    let db_album = state
        .store
        .album_by_unique_name(&album)
        .await?
        .ok_or(ApiError::NotFound("Album"))?;

    let mut body = DocumentBuilder::new();
    controls::add_namespace(&mut body);
    body.add_control(
        "self",
        Control::new(controls::album_reviews_url(&db_album.unique_name)),
    );
    body.add_control(
        "up",
        Control::new(controls::album_url(&db_album.unique_name))
            .title("Album item for which the reviews have been submitted"),
    );
    controls::reviews_all(&mut body, "spinrate:reviews-all");
    controls::add_review(&mut body, &db_album.unique_name);

    let reviews = state.store.reviews_for_album(db_album.id).await?;
    let items: Vec<Value> = reviews
        .iter()
        .map(|review| listing_item(review, true, false))
        .collect();
    body.set_field("items", json!(items));

    Ok(mason_response(StatusCode::OK, body.build()))
}

/// POST /api/albums/:album/reviews/
pub async fn create_review(
    State(state): State<AppState>,
    Path(album): Path<String>,
    headers: HeaderMap,
    payload: Bytes,
) -> Result<Response, ApiError> {
    let doc = require_json(&headers, &payload)?;
    schema::validate_review(&doc).map_err(ApiError::invalid_document)?;
    let body = review_body(doc)?;

    let db_album = state
        .store
        .album_by_unique_name(&album)
        .await?
        .ok_or(ApiError::NotFound("Album"))?;

    let username = body.user.to_lowercase();
    let db_user = state
        .store
        .user_by_username(&username)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let duplicate = || {
        ApiError::already_exists(format!(
            "User \"{}\" has already submitted a review to album with title \"{}\"",
            username, db_album.title
        ))
    };
    if state
        .store
        .review_exists_for(db_user.id, db_album.id)
        .await?
    {
        return Err(duplicate());
    }

    let (identifier, submission_date) = fresh_review_identifier(&state.store).await?;
    let input = ReviewInput {
        identifier: identifier.clone(),
        user_id: db_user.id,
        album_id: db_album.id,
        title: body.title,
        content: body.content,
        star_rating: body.star_rating,
        submission_date,
    };

    match state.store.create_review(&input).await {
        Ok(_) => Ok(created_at(controls::review_url(
            &db_album.unique_name,
            &identifier,
        ))),
        Err(StoreError::Conflict) => Err(duplicate()),
        Err(err) => Err(err.into()),
    }
}

/// GET /api/users/:user/reviews/
pub async fn reviews_by_user(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> Result<Response, ApiError> {
    let db_user = state
        .store
        .user_by_username(&user)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let mut body = DocumentBuilder::new();
    controls::add_namespace(&mut body);
    body.add_control(
        "self",
        Control::new(controls::user_reviews_url(&db_user.username)),
    );
    body.add_control(
        "up",
        Control::new(controls::user_url(&db_user.username))
            .title("User by whom the reviews have been submitted"),
    );
    controls::reviews_all(&mut body, "spinrate:reviews-all");

    let reviews = state.store.reviews_by_user(db_user.id).await?;
    let items: Vec<Value> = reviews
        .iter()
        .map(|review| listing_item(review, false, true))
        .collect();
    body.set_field("items", json!(items));

    Ok(mason_response(StatusCode::OK, body.build()))
}

/// GET /api/albums/:album/reviews/:review/
pub async fn review_item(
    State(state): State<AppState>,
    Path((album, review)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let db_album = state
        .store
        .album_by_unique_name(&album)
        .await?
        .ok_or(ApiError::NotFound("Album"))?;
    let db_review = state
        .store
        .review_for_album(db_album.id, &review)
        .await?
        .ok_or(ApiError::NotFound("Review"))?;
    let author = state
        .store
        .user_by_id(db_review.user_id)
        .await?
        .ok_or_else(|| ApiError::internal("review author row missing"))?;

    let mut body = DocumentBuilder::new()
        .field("identifier", json!(db_review.identifier))
        .field("user", json!(author.username))
        .field("album", json!(db_album.title))
        .field("artist", json!(db_album.artist))
        .field("title", json!(db_review.title))
        .field("content", json!(db_review.content))
        .field("star_rating", json!(db_review.star_rating))
        .field(
            "submission_date",
            json!(format_datetime(db_review.submission_date)),
        );
    controls::add_namespace(&mut body);
    body.add_control(
        "self",
        Control::new(controls::review_url(
            &db_album.unique_name,
            &db_review.identifier,
        )),
    );
    body.add_control("profile", Control::new(REVIEW_PROFILE));
    body.add_control(
        "author",
        Control::new(controls::user_url(&author.username))
            .title("The user who has submitted the review"),
    );
    body.add_control(
        "about",
        Control::new(controls::album_url(&db_album.unique_name))
            .title("The album for which the review has been written"),
    );
    controls::reviews_by(&mut body, &author.username);
    controls::reviews_for(&mut body, &db_album.unique_name);
    controls::reviews_all(&mut body, "spinrate:reviews-all");
    controls::edit_review(&mut body, &db_album.unique_name, &db_review.identifier);
    controls::delete_review(&mut body, &db_album.unique_name, &db_review.identifier);

    Ok(mason_response(StatusCode::OK, body.build()))
}

/// PUT /api/albums/:album/reviews/:review/
///
/// Replacing a review regenerates its identifier and submission timestamp,
/// so the canonical URL moves; the new one is returned in `Location`.
pub async fn update_review(
    State(state): State<AppState>,
    Path((album, review)): Path<(String, String)>,
    headers: HeaderMap,
    payload: Bytes,
) -> Result<Response, ApiError> {
    let doc = require_json(&headers, &payload)?;
    schema::validate_review(&doc).map_err(ApiError::invalid_document)?;
    let body = review_body(doc)?;

    let db_album = state
        .store
        .album_by_unique_name(&album)
        .await?
        .ok_or(ApiError::NotFound("Album"))?;
    let db_review = state
        .store
        .review_for_album(db_album.id, &review)
        .await?
        .ok_or(ApiError::NotFound("Review"))?;
    let author = state
        .store
        .user_by_id(db_review.user_id)
        .await?
        .ok_or_else(|| ApiError::internal("review author row missing"))?;

    let username = body.user.to_lowercase();
    if username != author.username {
        return Err(ApiError::conflict(
            "Username does not match",
            format!("Provided user \"{}\" has not submitted this review", username),
        ));
    }

    let (identifier, submission_date) = fresh_review_identifier(&state.store).await?;
    match state
        .store
        .update_review(
            db_review.id,
            &identifier,
            &body.title,
            &body.content,
            body.star_rating,
            submission_date,
        )
        .await
    {
        Ok(()) => Ok(replaced_at(controls::review_url(
            &db_album.unique_name,
            &identifier,
        ))),
        Err(StoreError::Conflict) => Err(ApiError::unexpected_conflict()),
        Err(err) => Err(err.into()),
    }
}

/// DELETE /api/albums/:album/reviews/:review/
pub async fn delete_review(
    State(state): State<AppState>,
    Path((album, review)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let db_album = state
        .store
        .album_by_unique_name(&album)
        .await?
        .ok_or(ApiError::NotFound("Album"))?;
    let db_review = state
        .store
        .review_for_album(db_album.id, &review)
        .await?
        .ok_or(ApiError::NotFound("Review"))?;

    state.store.delete_review(db_review.id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
