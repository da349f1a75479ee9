//! Canonical resource URLs and shared hypermedia controls
//!
//! All hrefs in response documents come from here, so the routing table in
//! `lib.rs` and the controls clients follow cannot drift apart.

use crate::mason::{Control, DocumentBuilder, LINK_RELATIONS_URL};
use crate::schema::{ALBUM_SCHEMA, REVIEW_QUERY_SCHEMA, REVIEW_SCHEMA, USER_SCHEMA};

pub const ENTRY_URL: &str = "/api/";
pub const USERS_URL: &str = "/api/users/";
pub const ALBUMS_URL: &str = "/api/albums/";
pub const REVIEWS_URL: &str = "/api/reviews/";

pub fn user_url(username: &str) -> String {
    format!("{}{}/", USERS_URL, username)
}

pub fn user_reviews_url(username: &str) -> String {
    format!("{}{}/reviews/", USERS_URL, username)
}

pub fn album_url(unique_name: &str) -> String {
    format!("{}{}/", ALBUMS_URL, unique_name)
}

pub fn album_reviews_url(unique_name: &str) -> String {
    format!("{}{}/reviews/", ALBUMS_URL, unique_name)
}

pub fn review_url(unique_name: &str, identifier: &str) -> String {
    format!("{}{}/reviews/{}/", ALBUMS_URL, unique_name, identifier)
}

/// Declare the `spinrate` namespace on a top-level document
pub fn add_namespace(doc: &mut DocumentBuilder) {
    doc.add_namespace("spinrate", LINK_RELATIONS_URL);
}

/// Link to the user collection, under the given control name
/// (`spinrate:users-all`, `self` or `collection` depending on context)
pub fn users_all(doc: &mut DocumentBuilder, name: &str) {
    doc.add_control(
        name,
        Control::new(USERS_URL).title("All users").method("GET"),
    );
}

/// Link to the album collection
pub fn albums_all(doc: &mut DocumentBuilder, name: &str) {
    doc.add_control(
        name,
        Control::new(ALBUMS_URL).title("All albums").method("GET"),
    );
}

/// Templated link to the filterable review collection
pub fn reviews_all(doc: &mut DocumentBuilder, name: &str) {
    doc.add_control(
        name,
        Control::new(format!(
            "{}?{{filterby,searchword,timeframe,nlatest}}",
            REVIEWS_URL
        ))
        .title("All reviews")
        .href_template()
        .schema(REVIEW_QUERY_SCHEMA.clone()),
    );
}

/// Reviews submitted by one user
pub fn reviews_by(doc: &mut DocumentBuilder, username: &str) {
    doc.add_control(
        "spinrate:reviews-by",
        Control::new(user_reviews_url(username))
            .title("Reviews by this user")
            .method("GET"),
    );
}

/// Reviews submitted for one album
pub fn reviews_for(doc: &mut DocumentBuilder, unique_name: &str) {
    doc.add_control(
        "spinrate:reviews-for",
        Control::new(album_reviews_url(unique_name))
            .title("Reviews for this album")
            .method("GET"),
    );
}

pub fn add_user(doc: &mut DocumentBuilder) {
    doc.add_control(
        "spinrate:add-user",
        Control::new(USERS_URL)
            .title("Add a new user")
            .method("POST")
            .encoding("json")
            .schema(USER_SCHEMA.clone()),
    );
}

pub fn add_album(doc: &mut DocumentBuilder) {
    doc.add_control(
        "spinrate:add-album",
        Control::new(ALBUMS_URL)
            .title("Add a new album")
            .method("POST")
            .encoding("json")
            .schema(ALBUM_SCHEMA.clone()),
    );
}

pub fn add_review(doc: &mut DocumentBuilder, unique_name: &str) {
    doc.add_control(
        "spinrate:add-review",
        Control::new(album_reviews_url(unique_name))
            .title("Add a review for this album")
            .method("POST")
            .encoding("json")
            .schema(REVIEW_SCHEMA.clone()),
    );
}

pub fn edit_user(doc: &mut DocumentBuilder, username: &str) {
    doc.add_control(
        "edit",
        Control::new(user_url(username))
            .title("Edit this user")
            .method("PUT")
            .encoding("json")
            .schema(USER_SCHEMA.clone()),
    );
}

pub fn delete_user(doc: &mut DocumentBuilder, username: &str) {
    doc.add_control(
        "spinrate:delete",
        Control::new(user_url(username))
            .title("Delete this user")
            .method("DELETE"),
    );
}

pub fn edit_album(doc: &mut DocumentBuilder, unique_name: &str) {
    doc.add_control(
        "edit",
        Control::new(album_url(unique_name))
            .title("Edit this album")
            .method("PUT")
            .encoding("json")
            .schema(ALBUM_SCHEMA.clone()),
    );
}

pub fn delete_album(doc: &mut DocumentBuilder, unique_name: &str) {
    doc.add_control(
        "spinrate:delete",
        Control::new(album_url(unique_name))
            .title("Delete this album")
            .method("DELETE"),
    );
}

pub fn edit_review(doc: &mut DocumentBuilder, unique_name: &str, identifier: &str) {
    doc.add_control(
        "edit",
        Control::new(review_url(unique_name, identifier))
            .title("Edit this review")
            .method("PUT")
            .encoding("json")
            .schema(REVIEW_SCHEMA.clone()),
    );
}

pub fn delete_review(doc: &mut DocumentBuilder, unique_name: &str, identifier: &str) {
    doc.add_control(
        "spinrate:delete",
        Control::new(review_url(unique_name, identifier))
            .title("Delete this review")
            .method("DELETE"),
    );
}
