//! Review queries, including the filter engine
//!
//! The filter engine resolves a `ReviewFilter` in two steps: the
//! relation-based search runs first and yields a set of foreign-key ids, then
//! one composed query applies the foreign-key filter, the submission-date
//! bounds (which live on the review row itself), the descending date order,
//! and finally the result cap.

use super::models::{Review, ReviewInput, ReviewListing};
use super::{Store, StoreResult};
use crate::filter::{FilterField, ReviewFilter};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

const LISTING_SELECT: &str = r#"
SELECT r.identifier, u.username, a.title AS album_title,
       a.unique_name AS album_unique_name, r.title, r.star_rating,
       r.submission_date
FROM reviews r
JOIN users u ON u.id = r.user_id
JOIN albums a ON a.id = r.album_id
"#;

fn listing_from_row(row: &SqliteRow) -> ReviewListing {
    ReviewListing {
        identifier: row.get("identifier"),
        username: row.get("username"),
        album_title: row.get("album_title"),
        album_unique_name: row.get("album_unique_name"),
        title: row.get("title"),
        star_rating: row.get("star_rating"),
        submission_date: row.get("submission_date"),
    }
}

fn review_from_row(row: &SqliteRow) -> Review {
    Review {
        id: row.get("id"),
        identifier: row.get("identifier"),
        user_id: row.get("user_id"),
        album_id: row.get("album_id"),
        title: row.get("title"),
        content: row.get("content"),
        star_rating: row.get("star_rating"),
        submission_date: row.get("submission_date"),
    }
}

impl Store {
    /// Resolve the review collection with the given filter applied
    pub async fn reviews_filtered(
        &self,
        filter: &ReviewFilter,
    ) -> StoreResult<Vec<ReviewListing>> {
        // Relation-based search first: the searchword selects rows of the
        // related entity, whose ids become a foreign-key filter. An empty
        // match set yields zero reviews, not an error.
        let scope_ids = match &filter.scope {
            None => None,
            Some((field, word)) => {
                let (sql, fk_column) = match field {
                    FilterField::AlbumTitle => {
                        ("SELECT id FROM albums WHERE title LIKE ?", "album_id")
                    }
                    FilterField::Artist => {
                        ("SELECT id FROM albums WHERE artist LIKE ?", "album_id")
                    }
                    FilterField::Genre => {
                        ("SELECT id FROM albums WHERE genre LIKE ?", "album_id")
                    }
                    FilterField::Username => {
                        ("SELECT id FROM users WHERE username LIKE ?", "user_id")
                    }
                };
                let ids: Vec<i64> = sqlx::query_scalar(sql)
                    .bind(format!("%{}%", word))
                    .fetch_all(&self.pool)
                    .await?;
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                Some((fk_column, ids))
            }
        };

        let mut sql = String::from(LISTING_SELECT);
        let mut clauses: Vec<String> = Vec::new();

        if let Some((fk_column, ids)) = &scope_ids {
            let placeholders = vec!["?"; ids.len()].join(", ");
            clauses.push(format!("r.{} IN ({})", fk_column, placeholders));
        }
        if filter.earliest.is_some() {
            clauses.push("date(r.submission_date) >= date(?)".to_string());
        }
        if filter.latest.is_some() {
            clauses.push("date(r.submission_date) <= date(?)".to_string());
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY r.submission_date DESC");
        if filter.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut query = sqlx::query(&sql);
        if let Some((_, ids)) = &scope_ids {
            for id in ids {
                query = query.bind(id);
            }
        }
        if let Some(earliest) = filter.earliest {
            query = query.bind(earliest);
        }
        if let Some(latest) = filter.latest {
            query = query.bind(latest);
        }
        if let Some(limit) = filter.limit {
            query = query.bind(limit);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(listing_from_row).collect())
    }

    pub async fn reviews_for_album(&self, album_id: i64) -> StoreResult<Vec<ReviewListing>> {
        let sql = format!(
            "{} WHERE r.album_id = ? ORDER BY r.submission_date DESC",
            LISTING_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(album_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(listing_from_row).collect())
    }

    pub async fn reviews_by_user(&self, user_id: i64) -> StoreResult<Vec<ReviewListing>> {
        let sql = format!(
            "{} WHERE r.user_id = ? ORDER BY r.submission_date DESC",
            LISTING_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(listing_from_row).collect())
    }

    /// Look up a review by identifier, scoped to one album. A review that
    /// exists under a different album is not found.
    pub async fn review_for_album(
        &self,
        album_id: i64,
        identifier: &str,
    ) -> StoreResult<Option<Review>> {
        let row = sqlx::query(
            r#"
            SELECT id, identifier, user_id, album_id, title, content,
                   star_rating, submission_date
            FROM reviews
            WHERE identifier = ? AND album_id = ?
            "#,
        )
        .bind(identifier)
        .bind(album_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(review_from_row))
    }

    pub async fn review_identifier_exists(&self, identifier: &str) -> StoreResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE identifier = ?")
            .bind(identifier)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// One review per user per album
    pub async fn review_exists_for(&self, user_id: i64, album_id: i64) -> StoreResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE user_id = ? AND album_id = ?")
                .bind(user_id)
                .bind(album_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn create_review(&self, review: &ReviewInput) -> StoreResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO reviews (identifier, user_id, album_id, title, content,
                                 star_rating, submission_date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&review.identifier)
        .bind(review.user_id)
        .bind(review.album_id)
        .bind(&review.title)
        .bind(&review.content)
        .bind(review.star_rating)
        .bind(review.submission_date)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Replace a review's representation. The author and album never change;
    /// the identifier and submission date are regenerated by the caller.
    pub async fn update_review(
        &self,
        id: i64,
        identifier: &str,
        title: &str,
        content: &str,
        star_rating: i64,
        submission_date: chrono::NaiveDateTime,
    ) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE reviews
            SET identifier = ?, title = ?, content = ?, star_rating = ?,
                submission_date = ?
            WHERE id = ?
            "#,
        )
        .bind(identifier)
        .bind(title)
        .bind(content)
        .bind(star_rating)
        .bind(submission_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a review; its tags cascade
    pub async fn delete_review(&self, id: i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
