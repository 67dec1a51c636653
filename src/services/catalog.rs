//! Catalog management service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookInput, BookPatch},
        pagination::PageRequest,
    },
    repository::Repository,
    services::mirror::BookMirror,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    mirror: Arc<dyn BookMirror>,
    sync_on_write: bool,
}

impl CatalogService {
    pub fn new(repository: Repository, mirror: Arc<dyn BookMirror>, sync_on_write: bool) -> Self {
        Self {
            repository,
            mirror,
            sync_on_write,
        }
    }

    /// One page of books plus the total count
    pub async fn list_books(&self, page: &PageRequest) -> AppResult<(Vec<Book>, i64)> {
        let total = self.repository.books.count().await?;
        page.ensure_within(total)?;

        let books = self
            .repository
            .books
            .list(page.offset(), page.page_size)
            .await?;
        Ok((books, total))
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a new book
    pub async fn create_book(&self, book: BookInput) -> AppResult<Book> {
        book.validate()?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!("Book created: id={}", created.id);

        self.mirror_upsert(&created).await;
        Ok(created)
    }

    /// Replace every field of a book. An unknown id wins over an invalid body.
    pub async fn update_book(&self, id: i64, book: BookInput) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await?;
        self.store_update(id, book).await
    }

    /// Change only the supplied fields of a book
    pub async fn patch_book(&self, id: i64, patch: BookPatch) -> AppResult<Book> {
        let current = self.repository.books.get_by_id(id).await?;
        patch.validate()?;

        self.store_update(id, patch.apply(current)).await
    }

    /// Delete a book
    pub async fn delete_book(&self, id: i64) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Book deleted: id={}", id);

        self.mirror_remove(id).await;
        Ok(())
    }

    /// Make the mirror match the catalog: every book is rewritten and
    /// documents for books no longer in the catalog are dropped.
    /// Returns the number mirrored.
    pub async fn resync_mirror(&self) -> AppResult<usize> {
        let books = self.repository.books.list_all().await?;
        self.push_to_mirror(books).await
    }

    async fn store_update(&self, id: i64, book: BookInput) -> AppResult<Book> {
        book.validate()?;

        let updated = self.repository.books.update(id, &book).await?;
        tracing::info!("Book updated: id={}", id);

        self.mirror_upsert(&updated).await;
        Ok(updated)
    }

    async fn push_to_mirror(&self, books: Vec<Book>) -> AppResult<usize> {
        let ids: Vec<i64> = books.iter().map(|book| book.id).collect();

        let mirrored = self.mirror.upsert_many(books).await?;
        let dropped = self.mirror.retain(ids).await?;
        if dropped > 0 {
            tracing::info!("Dropped {} orphaned mirror documents", dropped);
        }
        Ok(mirrored)
    }

    async fn mirror_upsert(&self, book: &Book) {
        if !self.sync_on_write {
            return;
        }
        if let Err(e) = self.mirror.upsert(book).await {
            tracing::warn!("Mirror upsert failed for book {}: {}", book.id, e);
        }
    }

    async fn mirror_remove(&self, id: i64) {
        if !self.sync_on_write {
            return;
        }
        if let Err(e) = self.mirror.remove(id).await {
            tracing::warn!("Mirror delete failed for book {}: {}", id, e);
        }
    }
}
