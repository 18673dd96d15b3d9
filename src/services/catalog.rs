//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books with filters
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.search(query).await
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a new book; all copies start available
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!(
            "Cataloged book {} ({} copies)",
            created.id,
            created.total_copies
        );
        Ok(created)
    }

    /// Delete a book and return the removed record.
    /// Outstanding loans are not checked; loan rows keep referencing the id.
    pub async fn delete_book(&self, id: i64) -> AppResult<Book> {
        let deleted = self.repository.books.delete(id).await?;
        tracing::info!("Deleted book {} from catalog", id);
        Ok(deleted)
    }
}
