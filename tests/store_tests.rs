//! Storage-layer tests: constraint surfacing, referential integrity and
//! cascade deletion against a real database file

use chrono::{NaiveDate, NaiveDateTime};
use spinrate::db::models::{AlbumInput, ReviewInput, TagInput};
use spinrate::db::{init_database, Store, StoreError};
use spinrate::filter::{FilterField, ReviewFilter};
use tempfile::TempDir;

async fn setup() -> (Store, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let pool = init_database(&dir.path().join("store-test.db"))
        .await
        .expect("database initializes");
    (Store::new(pool), dir)
}

fn datetime(y: i32, mo: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn album(unique_name: &str, title: &str, artist: &str) -> AlbumInput {
    AlbumInput {
        unique_name: unique_name.to_string(),
        title: title.to_string(),
        artist: artist.to_string(),
        publication_date: None,
        duration: None,
        genre: Some("black metal".to_string()),
    }
}

fn review(identifier: &str, user_id: i64, album_id: i64, when: NaiveDateTime) -> ReviewInput {
    ReviewInput {
        identifier: identifier.to_string(),
        user_id,
        album_id,
        title: "A review".to_string(),
        content: "Contents".to_string(),
        star_rating: 3,
        submission_date: when,
    }
}

fn tag(identifier: &str, user_id: i64, review_id: i64, meaning: &str) -> TagInput {
    TagInput {
        identifier: identifier.to_string(),
        user_id,
        review_id,
        meaning: meaning.to_string(),
        date_created: datetime(2021, 3, 1, 9),
    }
}

const PW: &str = "9750c9fbe856aa813c24f08b0faeba79f4f9b0d05102d4833fac8a6a5f694827";

async fn count(store: &Store, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(store.pool())
        .await
        .unwrap()
}

// =============================================================================
// Initialization
// =============================================================================

#[tokio::test]
async fn test_database_created_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("fresh.db");
    assert!(!db_path.exists());

    let pool = init_database(&db_path).await.expect("creates database");
    assert!(db_path.exists());

    // opening again is fine
    drop(pool);
    init_database(&db_path).await.expect("reopens database");
}

// =============================================================================
// Uniqueness constraints
// =============================================================================

#[tokio::test]
async fn test_user_uniqueness() {
    let (store, _dir) = setup().await;
    store.create_user("admin", "root@admin.com", PW).await.unwrap();

    let err = store
        .create_user("admin", "other@admin.com", PW)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict), "username collision");

    let err = store
        .create_user("other", "root@admin.com", PW)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict), "email collision");

    assert!(store.username_taken("admin").await.unwrap());
    assert!(!store.username_taken("other").await.unwrap());
}

#[tokio::test]
async fn test_album_uniqueness() {
    let (store, _dir) = setup().await;
    store.create_album(&album("stc", "STC", "Vitsaus")).await.unwrap();

    let err = store
        .create_album(&album("stc", "Other", "Someone"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict), "unique_name collision");

    let err = store
        .create_album(&album("stc-reissue", "STC", "Vitsaus"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict), "(title, artist) collision");

    // same title under a different artist is fine
    store
        .create_album(&album("stc-cover", "STC", "Horna"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_review_one_per_user_per_album() {
    let (store, _dir) = setup().await;
    let user = store.create_user("admin", "root@admin.com", PW).await.unwrap();
    let disc = store.create_album(&album("stc", "STC", "Vitsaus")).await.unwrap();

    store
        .create_review(&review("review_1", user, disc, datetime(2021, 2, 19, 12)))
        .await
        .unwrap();
    let err = store
        .create_review(&review("review_2", user, disc, datetime(2021, 2, 20, 12)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict));

    assert!(store.review_exists_for(user, disc).await.unwrap());
    assert!(store.review_identifier_exists("review_1").await.unwrap());
    assert!(!store.review_identifier_exists("review_9").await.unwrap());
}

#[tokio::test]
async fn test_tag_one_per_user_per_review() {
    let (store, _dir) = setup().await;
    let user = store.create_user("admin", "root@admin.com", PW).await.unwrap();
    let other = store.create_user("ytc", "rapper@g_mail.com", PW).await.unwrap();
    let disc = store.create_album(&album("stc", "STC", "Vitsaus")).await.unwrap();
    let rev = store
        .create_review(&review("review_1", user, disc, datetime(2021, 2, 19, 12)))
        .await
        .unwrap();

    store.create_tag(&tag("tag_1", other, rev, "useful")).await.unwrap();
    let err = store
        .create_tag(&tag("tag_2", other, rev, "not useful"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict));
}

#[tokio::test]
async fn test_tag_meaning_restricted() {
    let (store, _dir) = setup().await;
    let user = store.create_user("admin", "root@admin.com", PW).await.unwrap();
    let disc = store.create_album(&album("stc", "STC", "Vitsaus")).await.unwrap();
    let rev = store
        .create_review(&review("review_1", user, disc, datetime(2021, 2, 19, 12)))
        .await
        .unwrap();

    let err = store
        .create_tag(&tag("tag_1", user, rev, "somewhat useful"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Invalid(_)));
}

// =============================================================================
// Referential integrity
// =============================================================================

#[tokio::test]
async fn test_review_requires_existing_rows() {
    let (store, _dir) = setup().await;
    let user = store.create_user("admin", "root@admin.com", PW).await.unwrap();

    let err = store
        .create_review(&review("review_1", user, 999, datetime(2021, 2, 19, 12)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ForeignKey));

    let disc = store.create_album(&album("stc", "STC", "Vitsaus")).await.unwrap();
    let err = store
        .create_review(&review("review_1", 999, disc, datetime(2021, 2, 19, 12)))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ForeignKey));
}

// =============================================================================
// Cascade deletion
// =============================================================================

async fn seed_full(store: &Store) -> (i64, i64, i64, i64) {
    let admin = store.create_user("admin", "root@admin.com", PW).await.unwrap();
    let ytc = store.create_user("ytc", "rapper@g_mail.com", PW).await.unwrap();
    let stc = store.create_album(&album("stc", "STC", "Vitsaus")).await.unwrap();
    let kun = store
        .create_album(&album("kun-synkka", "Kun Synkka Ikuisuus Avautuu", "Horna"))
        .await
        .unwrap();

    let r1 = store
        .create_review(&review("review_1", admin, stc, datetime(2021, 2, 19, 12)))
        .await
        .unwrap();
    let r2 = store
        .create_review(&review("review_2", ytc, kun, datetime(2021, 2, 20, 12)))
        .await
        .unwrap();

    store.create_tag(&tag("tag_1", ytc, r1, "not useful")).await.unwrap();
    store.create_tag(&tag("tag_2", admin, r2, "useful")).await.unwrap();

    (admin, ytc, stc, kun)
}

#[tokio::test]
async fn test_deleting_user_removes_reviews_and_tags() {
    let (store, _dir) = setup().await;
    let (admin, _ytc, _stc, _kun) = seed_full(&store).await;

    store.delete_user(admin).await.unwrap();

    // admin's review went away, and with it the tag ytc put on it; admin's
    // own tag on the other review went away through the user
    assert_eq!(count(&store, "users").await, 1);
    assert_eq!(count(&store, "reviews").await, 1);
    assert_eq!(count(&store, "tags").await, 0);
}

#[tokio::test]
async fn test_deleting_album_removes_reviews_and_tags_transitively() {
    let (store, _dir) = setup().await;
    let (_admin, _ytc, stc, _kun) = seed_full(&store).await;

    store.delete_album(stc).await.unwrap();

    assert_eq!(count(&store, "albums").await, 1);
    assert_eq!(count(&store, "reviews").await, 1);
    assert_eq!(count(&store, "tags").await, 1);
}

#[tokio::test]
async fn test_deleting_review_removes_its_tags() {
    let (store, _dir) = setup().await;
    let (_admin, ytc, _stc, kun) = seed_full(&store).await;

    let rev = store
        .review_for_album(kun, "review_2")
        .await
        .unwrap()
        .expect("seeded review exists");
    assert_eq!(rev.user_id, ytc);
    assert_eq!(store.tags_for_review(rev.id).await.unwrap().len(), 1);

    store.delete_review(rev.id).await.unwrap();

    assert_eq!(count(&store, "reviews").await, 1);
    assert_eq!(count(&store, "tags").await, 1, "only the other review's tag remains");
}

// =============================================================================
// Filter engine composition at the store level
// =============================================================================

#[tokio::test]
async fn test_filtered_reviews_compose() {
    let (store, _dir) = setup().await;
    seed_full(&store).await;

    // no filtering: everything, newest first
    let all = store.reviews_filtered(&ReviewFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].identifier, "review_2");

    // scope through the user foreign key
    let filter = ReviewFilter {
        scope: Some((FilterField::Username, "adm".to_string())),
        ..Default::default()
    };
    let mine = store.reviews_filtered(&filter).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].username, "admin");

    // scope plus time window plus cap
    let filter = ReviewFilter {
        scope: Some((FilterField::Genre, "black".to_string())),
        earliest: NaiveDate::from_ymd_opt(2021, 2, 19),
        latest: NaiveDate::from_ymd_opt(2021, 2, 19),
        limit: Some(1),
    };
    let narrowed = store.reviews_filtered(&filter).await.unwrap();
    assert_eq!(narrowed.len(), 1);
    assert_eq!(narrowed[0].identifier, "review_1");

    // a scope that matches no related entity yields nothing
    let filter = ReviewFilter {
        scope: Some((FilterField::AlbumTitle, "zzz".to_string())),
        ..Default::default()
    };
    assert!(store.reviews_filtered(&filter).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_user_moves_natural_key() {
    let (store, _dir) = setup().await;
    let id = store.create_user("admin", "root@admin.com", PW).await.unwrap();

    store
        .update_user(id, "overlord", "root@admin.com", PW)
        .await
        .unwrap();

    assert!(store.user_by_username("admin").await.unwrap().is_none());
    let renamed = store.user_by_username("overlord").await.unwrap().unwrap();
    assert_eq!(renamed.id, id);
}
