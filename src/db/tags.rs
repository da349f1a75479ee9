//! Tag queries
//!
//! Tags have no HTTP endpoints; the storage layer still owns them so that
//! usefulness votes persist and cascade away with their user and review.

use super::models::{Tag, TagInput};
use super::{Store, StoreError, StoreResult};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// The only meanings a tag may carry
pub const TAG_MEANINGS: [&str; 2] = ["useful", "not useful"];

fn tag_from_row(row: &SqliteRow) -> Tag {
    Tag {
        id: row.get("id"),
        identifier: row.get("identifier"),
        user_id: row.get("user_id"),
        review_id: row.get("review_id"),
        meaning: row.get("meaning"),
        date_created: row.get("date_created"),
    }
}

impl Store {
    pub async fn create_tag(&self, tag: &TagInput) -> StoreResult<i64> {
        if !TAG_MEANINGS.contains(&tag.meaning.as_str()) {
            return Err(StoreError::Invalid(format!(
                "tag meaning must be 'useful' or 'not useful' (got '{}')",
                tag.meaning
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO tags (identifier, user_id, review_id, meaning, date_created)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&tag.identifier)
        .bind(tag.user_id)
        .bind(tag.review_id)
        .bind(&tag.meaning)
        .bind(tag.date_created)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn tags_for_review(&self, review_id: i64) -> StoreResult<Vec<Tag>> {
        let rows = sqlx::query(
            r#"
            SELECT id, identifier, user_id, review_id, meaning, date_created
            FROM tags
            WHERE review_id = ?
            ORDER BY id
            "#,
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(tag_from_row).collect())
    }

    pub async fn tag_identifier_exists(&self, identifier: &str) -> StoreResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE identifier = ?")
            .bind(identifier)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }
}
