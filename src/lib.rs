//! # spinrate
//!
//! Hypermedia-driven REST API for managing music albums, user accounts and
//! album reviews. Every response body is a Mason document whose embedded
//! controls let a browsing client discover the available operations instead
//! of hard-coding URLs.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod mason;
pub mod schema;
pub mod validators;

pub use db::Store;
pub use error::{Error, Result};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Repository over the relational store; the only shared mutable resource
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/", get(api::entry_point))
        .route(
            "/api/users/",
            get(api::user_collection).post(api::create_user),
        )
        .route(
            "/api/users/:user/",
            get(api::user_item)
                .put(api::update_user)
                .delete(api::delete_user),
        )
        .route("/api/users/:user/reviews/", get(api::reviews_by_user))
        .route(
            "/api/albums/",
            get(api::album_collection).post(api::create_album),
        )
        .route(
            "/api/albums/:album/",
            get(api::album_item)
                .put(api::update_album)
                .delete(api::delete_album),
        )
        .route(
            "/api/albums/:album/reviews/",
            get(api::reviews_by_album).post(api::create_review),
        )
        .route(
            "/api/albums/:album/reviews/:review/",
            get(api::review_item)
                .put(api::update_review)
                .delete(api::delete_review),
        )
        .route("/api/reviews/", get(api::review_collection))
        .route("/health", get(api::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
