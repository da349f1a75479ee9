//! Database initialization
//!
//! Creates the database file on first run and brings up the four-table
//! schema idempotently. Referential integrity is enforced on every pooled
//! connection via the connect options, so cascade deletes and foreign-key
//! checks hold no matter which connection serves a request.

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Open (creating if necessary) the database and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_users_table(&pool).await?;
    create_albums_table(&pool).await?;
    create_reviews_table(&pool).await?;
    create_tags_table(&pool).await?;

    Ok(pool)
}

async fn create_users_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_albums_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS albums (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            unique_name TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            publication_date DATE,
            duration TIME,
            genre TEXT,
            UNIQUE (title, artist)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_reviews_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            identifier TEXT NOT NULL UNIQUE,
            user_id INTEGER NOT NULL
                REFERENCES users (id) ON DELETE CASCADE ON UPDATE CASCADE,
            album_id INTEGER NOT NULL
                REFERENCES albums (id) ON DELETE CASCADE ON UPDATE CASCADE,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            star_rating INTEGER NOT NULL,
            submission_date TIMESTAMP NOT NULL,
            UNIQUE (user_id, album_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_tags_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            identifier TEXT NOT NULL UNIQUE,
            user_id INTEGER NOT NULL
                REFERENCES users (id) ON DELETE CASCADE ON UPDATE CASCADE,
            review_id INTEGER NOT NULL
                REFERENCES reviews (id) ON DELETE CASCADE ON UPDATE CASCADE,
            meaning TEXT NOT NULL CHECK (meaning IN ('useful', 'not useful')),
            date_created TIMESTAMP NOT NULL,
            UNIQUE (user_id, review_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
