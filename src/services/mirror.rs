//! Document-store mirror of the book catalog
//!
//! Every operation opens its own client, does its work and shuts the client
//! down before returning, whatever the outcome.

use std::future::Future;

use async_trait::async_trait;
use bson::{doc, DateTime as BsonDateTime, Document};
use chrono::{NaiveTime, TimeZone, Utc};
use futures::TryStreamExt;
use mongodb::{options::ReplaceOptions, Client, Collection};
use rust_decimal::prelude::ToPrimitive;

use crate::{config::MirrorConfig, error::AppResult, models::book::Book};

/// Read/write access to the mirrored book collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookMirror: Send + Sync {
    /// Run an aggregation pipeline and collect every resulting document
    async fn aggregate(&self, pipeline: Vec<Document>) -> AppResult<Vec<Document>>;

    /// Insert or replace the mirrored copy of a book
    async fn upsert(&self, book: &Book) -> AppResult<()>;

    /// Drop the mirrored copy of a book, if any
    async fn remove(&self, id: i64) -> AppResult<()>;

    /// Insert or replace many books in one session. Returns how many were written.
    async fn upsert_many(&self, books: Vec<Book>) -> AppResult<usize>;

    /// Drop every mirrored book whose id is not in `ids`. Returns how many were dropped.
    async fn retain(&self, ids: Vec<i64>) -> AppResult<u64>;
}

/// MongoDB-backed mirror
#[derive(Clone)]
pub struct MongoMirror {
    config: MirrorConfig,
}

impl MongoMirror {
    pub fn new(config: MirrorConfig) -> Self {
        Self { config }
    }

    /// Open a client, hand the collection to `work`, then shut the client down.
    async fn with_collection<T, F, Fut>(&self, work: F) -> AppResult<T>
    where
        F: FnOnce(Collection<Document>) -> Fut + Send,
        Fut: Future<Output = AppResult<T>> + Send,
        T: Send,
    {
        let client = Client::with_uri_str(&self.config.uri).await?;
        let collection = client
            .database(&self.config.database)
            .collection::<Document>(&self.config.collection);

        let result = work(collection).await;
        client.shutdown().await;
        result
    }
}

#[async_trait]
impl BookMirror for MongoMirror {
    async fn aggregate(&self, pipeline: Vec<Document>) -> AppResult<Vec<Document>> {
        self.with_collection(|collection| async move {
            let cursor = collection.aggregate(pipeline, None).await?;
            let rows: Vec<Document> = cursor.try_collect().await?;
            Ok(rows)
        })
        .await
    }

    async fn upsert(&self, book: &Book) -> AppResult<()> {
        let id = book.id;
        let document = mirror_document(book);
        self.with_collection(|collection| async move {
            let options = ReplaceOptions::builder().upsert(true).build();
            collection
                .replace_one(doc! { "_id": id }, document, options)
                .await?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, id: i64) -> AppResult<()> {
        self.with_collection(|collection| async move {
            collection.delete_one(doc! { "_id": id }, None).await?;
            Ok(())
        })
        .await
    }

    async fn upsert_many(&self, books: Vec<Book>) -> AppResult<usize> {
        let documents: Vec<(i64, Document)> = books
            .iter()
            .map(|book| (book.id, mirror_document(book)))
            .collect();

        self.with_collection(|collection| async move {
            let options = ReplaceOptions::builder().upsert(true).build();
            for (id, document) in &documents {
                collection
                    .replace_one(doc! { "_id": *id }, document, options.clone())
                    .await?;
            }
            Ok(documents.len())
        })
        .await
    }

    async fn retain(&self, ids: Vec<i64>) -> AppResult<u64> {
        self.with_collection(|collection| async move {
            let result = collection
                .delete_many(doc! { "_id": { "$nin": ids } }, None)
                .await?;
            Ok(result.deleted_count)
        })
        .await
    }
}

/// Mirror representation of a book: the date becomes midnight UTC so `$year`
/// works on it, and the price becomes a double.
pub fn mirror_document(book: &Book) -> Document {
    let published = Utc.from_utc_datetime(&book.published_date.and_time(NaiveTime::MIN));

    doc! {
        "_id": book.id,
        "title": book.title.clone(),
        "author": book.author.clone(),
        "published_date": BsonDateTime::from_chrono(published),
        "gender": book.gender.as_str(),
        "price": book.price.to_f64().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::Genre;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn mirror_document_keeps_book_fields() {
        let book = Book {
            id: 12,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            published_date: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
            gender: Genre::SciFi,
            price: Decimal::from_str("19.99").unwrap(),
        };

        let doc = mirror_document(&book);
        assert_eq!(doc.get_i64("_id").unwrap(), 12);
        assert_eq!(doc.get_str("title").unwrap(), "Dune");
        assert_eq!(doc.get_str("author").unwrap(), "Frank Herbert");
        assert_eq!(doc.get_str("gender").unwrap(), "Sci-Fi");
        assert!((doc.get_f64("price").unwrap() - 19.99).abs() < 1e-9);
        assert_eq!(
            *doc.get_datetime("published_date").unwrap(),
            BsonDateTime::from_chrono(Utc.with_ymd_and_hms(1965, 8, 1, 0, 0, 0).unwrap())
        );
    }
}
