//! Persisted entity rows and insert inputs

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// User row
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// SHA-256 hash of the password; never rendered in responses
    pub password: String,
}

/// Album row
#[derive(Debug, Clone)]
pub struct Album {
    pub id: i64,
    pub unique_name: String,
    pub title: String,
    pub artist: String,
    pub publication_date: Option<NaiveDate>,
    pub duration: Option<NaiveTime>,
    pub genre: Option<String>,
}

/// Replacement fields for an album (create and whole-resource update)
#[derive(Debug, Clone)]
pub struct AlbumInput {
    pub unique_name: String,
    pub title: String,
    pub artist: String,
    pub publication_date: Option<NaiveDate>,
    pub duration: Option<NaiveTime>,
    pub genre: Option<String>,
}

/// Review row
#[derive(Debug, Clone)]
pub struct Review {
    pub id: i64,
    pub identifier: String,
    pub user_id: i64,
    pub album_id: i64,
    pub title: String,
    pub content: String,
    pub star_rating: i64,
    pub submission_date: NaiveDateTime,
}

/// Fields for a new review
#[derive(Debug, Clone)]
pub struct ReviewInput {
    pub identifier: String,
    pub user_id: i64,
    pub album_id: i64,
    pub title: String,
    pub content: String,
    pub star_rating: i64,
    pub submission_date: NaiveDateTime,
}

/// A review joined with its author and album, as rendered in collections
#[derive(Debug, Clone)]
pub struct ReviewListing {
    pub identifier: String,
    pub username: String,
    pub album_title: String,
    pub album_unique_name: String,
    pub title: String,
    pub star_rating: i64,
    pub submission_date: NaiveDateTime,
}

/// Tag row (usefulness vote on a review)
#[derive(Debug, Clone)]
pub struct Tag {
    pub id: i64,
    pub identifier: String,
    pub user_id: i64,
    pub review_id: i64,
    pub meaning: String,
    pub date_created: NaiveDateTime,
}

/// Fields for a new tag
#[derive(Debug, Clone)]
pub struct TagInput {
    pub identifier: String,
    pub user_id: i64,
    pub review_id: i64,
    pub meaning: String,
    pub date_created: NaiveDateTime,
}
