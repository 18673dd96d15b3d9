//! Books repository for database operations

use sqlx::{Pool, QueryBuilder, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, CreateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Search books with optional category/availability filters and pagination
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM books WHERE 1=1");

        if let Some(ref category) = query.category {
            builder.push(" AND LOWER(category) = LOWER(");
            builder.push_bind(category);
            builder.push(")");
        }
        if query.available.unwrap_or(false) {
            builder.push(" AND available_copies > 0");
        }

        builder.push(" ORDER BY id");
        if let Some(limit) = query.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit);
        } else {
            builder.push(" LIMIT -1");
        }
        if let Some(skip) = query.skip {
            builder.push(" OFFSET ");
            builder.push_bind(skip);
        }

        let books = builder.build_query_as::<Book>().fetch_all(&self.pool).await?;
        Ok(books)
    }

    /// Insert a new book; all copies start available
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, category, total_copies, available_copies)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.category)
        .bind(book.total_copies)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Delete a book and return the removed record
    pub async fn delete(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("DELETE FROM books WHERE id = ?1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }
}
