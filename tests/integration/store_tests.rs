//! Service tests against a real PostgreSQL database
//!
//! Needs `DATABASE_URL` (or the default from config) pointing at a disposable
//! database. The document store is replaced by a recording stub.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bson::Document;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

use biblioteca_server::{
    config::AppConfig,
    models::book::{Book, BookInput, Genre},
    repository::Repository,
    services::{mirror::BookMirror, Services},
    AppError, AppResult,
};

/// Mirror stub that records every write and can be told to fail
#[derive(Default)]
struct RecordingMirror {
    down: bool,
    writes: Mutex<Vec<String>>,
    retained: Mutex<Option<Vec<i64>>>,
}

impl RecordingMirror {
    fn record(&self, entry: String) -> AppResult<()> {
        self.writes.lock().unwrap().push(entry);
        if self.down {
            return Err(AppError::Internal("connection refused".to_string()));
        }
        Ok(())
    }

    fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookMirror for RecordingMirror {
    async fn aggregate(&self, _pipeline: Vec<Document>) -> AppResult<Vec<Document>> {
        Ok(vec![])
    }

    async fn upsert(&self, book: &Book) -> AppResult<()> {
        self.record(format!("upsert:{}", book.id))
    }

    async fn remove(&self, id: i64) -> AppResult<()> {
        self.record(format!("remove:{}", id))
    }

    async fn upsert_many(&self, books: Vec<Book>) -> AppResult<usize> {
        self.record(format!("upsert_many:{}", books.len()))?;
        Ok(books.len())
    }

    async fn retain(&self, ids: Vec<i64>) -> AppResult<u64> {
        *self.retained.lock().unwrap() = Some(ids);
        Ok(0)
    }
}

async fn pool(config: &AppConfig) -> PgPool {
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

async fn services(mirror: Arc<RecordingMirror>, sync_on_write: bool) -> (Services, PgPool) {
    let mut config = AppConfig::default();
    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database.url = url;
    }
    config.mirror.sync_on_write = sync_on_write;

    let pool = pool(&config).await;
    (Services::new(Repository::new(pool.clone()), &config, mirror), pool)
}

fn input(price: &str) -> BookInput {
    BookInput {
        title: "Test Book".to_string(),
        author: "Test Author".to_string(),
        published_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        gender: Genre::Fiction,
        price: price.parse::<Decimal>().unwrap(),
    }
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_writes_succeed_while_mirror_is_down() {
    let mirror = Arc::new(RecordingMirror {
        down: true,
        ..Default::default()
    });
    let (services, _pool) = services(mirror.clone(), true).await;

    let created = services.catalog.create_book(input("19.99")).await.unwrap();
    let updated = services
        .catalog
        .update_book(created.id, input("25.00"))
        .await
        .unwrap();
    assert_eq!(updated.price, Decimal::new(2500, 2));

    services.catalog.delete_book(created.id).await.unwrap();
    assert!(matches!(
        services.catalog.get_book(created.id).await,
        Err(AppError::NotFound(_))
    ));

    assert_eq!(
        mirror.writes(),
        vec![
            format!("upsert:{}", created.id),
            format!("upsert:{}", created.id),
            format!("remove:{}", created.id),
        ]
    );
}

#[tokio::test]
#[ignore]
async fn test_disabled_write_through_skips_mirror() {
    let mirror = Arc::new(RecordingMirror::default());
    let (services, _pool) = services(mirror.clone(), false).await;

    let created = services.catalog.create_book(input("10.00")).await.unwrap();
    services.catalog.delete_book(created.id).await.unwrap();

    assert!(mirror.writes().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_put_to_unknown_book_is_not_found_before_validation() {
    let mirror = Arc::new(RecordingMirror::default());
    let (services, _pool) = services(mirror.clone(), true).await;

    let mut invalid = input("10.00");
    invalid.title = String::new();

    let err = services
        .catalog
        .update_book(i64::MAX, invalid)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(mirror.writes().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_resync_drops_books_deleted_behind_the_mirror() {
    let mirror = Arc::new(RecordingMirror::default());
    let (services, pool) = services(mirror.clone(), false).await;

    let kept = services.catalog.create_book(input("10.00")).await.unwrap();
    let orphan = services.catalog.create_book(input("30.00")).await.unwrap();

    // Row removed without the mirror hearing about it
    sqlx::query("DELETE FROM books WHERE id = $1")
        .bind(orphan.id)
        .execute(&pool)
        .await
        .unwrap();

    services.catalog.resync_mirror().await.unwrap();

    let retained = mirror.retained.lock().unwrap().clone().unwrap();
    assert!(retained.contains(&kept.id));
    assert!(!retained.contains(&orphan.id));
}

#[tokio::test]
#[ignore]
async fn test_refresh_rejects_deactivated_account() {
    let mirror = Arc::new(RecordingMirror::default());
    let (services, pool) = services(mirror, true).await;

    let username = format!("user-{}", uuid::Uuid::new_v4());
    let user = services
        .auth
        .create_user(&username, "t18$V3Y9]lE)")
        .await
        .unwrap();
    let tokens = services.auth.issue_tokens(&user).unwrap();

    assert!(services.auth.refresh(&tokens.refresh).await.is_ok());

    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(matches!(
        services.auth.refresh(&tokens.refresh).await,
        Err(AppError::Authentication(_))
    ));
}
