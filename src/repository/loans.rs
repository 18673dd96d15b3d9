//! Loans repository for database operations
//!
//! Borrow and return are read-modify-write sequences over the book's
//! availability counter, so both run inside a single transaction.

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        loan::{Loan, LoanDetails},
    },
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Sqlite>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Borrow a book: decrement its availability and append a loan record
    pub async fn borrow(&self, book_id: i64, user_id: i64) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?1")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        if book.available_copies <= 0 {
            return Err(AppError::InvalidState(
                "No available copies of this book".to_string(),
            ));
        }

        sqlx::query("UPDATE books SET available_copies = available_copies - 1 WHERE id = ?1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (book_id, user_id, loan_date, return_date)
            VALUES (?1, ?2, ?3, NULL)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(loan)
    }

    /// Return a book on behalf of `user_id`.
    ///
    /// Closes the caller's oldest active loan on the book; an admin caller
    /// without a loan of their own closes the oldest active loan overall.
    /// Returns the book with its restored availability.
    pub async fn return_book(&self, book_id: i64, user_id: i64, is_admin: bool) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?1")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        let active: Vec<Loan> = sqlx::query_as(
            "SELECT * FROM loans WHERE book_id = ?1 AND return_date IS NULL ORDER BY id",
        )
        .bind(book_id)
        .fetch_all(&mut *tx)
        .await?;

        if active.is_empty() {
            return Err(AppError::InvalidState(
                "Book is not currently borrowed".to_string(),
            ));
        }

        let loan = match active.iter().find(|l| l.user_id == user_id) {
            Some(own) => own,
            None if is_admin => &active[0],
            None => {
                return Err(AppError::Authorization(
                    "You can only return books you borrowed".to_string(),
                ))
            }
        };

        sqlx::query("UPDATE loans SET return_date = ?1 WHERE id = ?2")
            .bind(Utc::now())
            .bind(loan.id)
            .execute(&mut *tx)
            .await?;

        let book = sqlx::query_as::<_, Book>(
            "UPDATE books SET available_copies = available_copies + 1 WHERE id = ?1 RETURNING *",
        )
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(book)
    }

    /// Get all loans for a user, insertion order, with the book embedded.
    /// Loans whose book has since been deleted are still listed, without
    /// the book summary.
    pub async fn get_user_loans(&self, user_id: i64) -> AppResult<Vec<LoanDetails>> {
        let rows = sqlx::query_as::<_, UserLoanRow>(
            r#"
            SELECT l.id, l.book_id, l.user_id, l.loan_date, l.return_date,
                   b.title, b.author
            FROM loans l
            LEFT JOIN books b ON l.book_id = b.id
            WHERE l.user_id = ?1
            ORDER BY l.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LoanDetails::from).collect())
    }
}

/// Internal row structure for the user-loans join
#[derive(sqlx::FromRow)]
struct UserLoanRow {
    id: i64,
    book_id: i64,
    user_id: i64,
    loan_date: chrono::DateTime<Utc>,
    return_date: Option<chrono::DateTime<Utc>>,
    title: Option<String>,
    author: Option<String>,
}

impl From<UserLoanRow> for LoanDetails {
    fn from(row: UserLoanRow) -> Self {
        let book = match (row.title, row.author) {
            (Some(title), Some(author)) => Some(crate::models::book::BookSummary {
                id: row.book_id,
                title,
                author,
            }),
            _ => None,
        };
        LoanDetails {
            id: row.id,
            book_id: row.book_id,
            user_id: row.user_id,
            loan_date: row.loan_date,
            return_date: row.return_date,
            book,
        }
    }
}
