//! Album queries

use super::models::{Album, AlbumInput};
use super::{Store, StoreResult};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

fn album_from_row(row: &SqliteRow) -> Album {
    Album {
        id: row.get("id"),
        unique_name: row.get("unique_name"),
        title: row.get("title"),
        artist: row.get("artist"),
        publication_date: row.get("publication_date"),
        duration: row.get("duration"),
        genre: row.get("genre"),
    }
}

const ALBUM_COLUMNS: &str =
    "id, unique_name, title, artist, publication_date, duration, genre";

impl Store {
    pub async fn list_albums(&self) -> StoreResult<Vec<Album>> {
        let sql = format!("SELECT {ALBUM_COLUMNS} FROM albums ORDER BY id");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        Ok(rows.iter().map(album_from_row).collect())
    }

    pub async fn album_by_unique_name(&self, unique_name: &str) -> StoreResult<Option<Album>> {
        let sql = format!("SELECT {ALBUM_COLUMNS} FROM albums WHERE unique_name = ?");
        let row = sqlx::query(&sql)
            .bind(unique_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(album_from_row))
    }

    pub async fn unique_name_taken(&self, unique_name: &str) -> StoreResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM albums WHERE unique_name = ?")
            .bind(unique_name)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    pub async fn create_album(&self, album: &AlbumInput) -> StoreResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO albums (unique_name, title, artist, publication_date, duration, genre)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&album.unique_name)
        .bind(&album.title)
        .bind(&album.artist)
        .bind(album.publication_date)
        .bind(album.duration)
        .bind(&album.genre)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Whole-resource replace; optional fields absent from the input become NULL
    pub async fn update_album(&self, id: i64, album: &AlbumInput) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE albums
            SET unique_name = ?, title = ?, artist = ?,
                publication_date = ?, duration = ?, genre = ?
            WHERE id = ?
            "#,
        )
        .bind(&album.unique_name)
        .bind(&album.title)
        .bind(&album.artist)
        .bind(album.publication_date)
        .bind(album.duration)
        .bind(&album.genre)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete an album; its reviews (and their tags) cascade
    pub async fn delete_album(&self, id: i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM albums WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
