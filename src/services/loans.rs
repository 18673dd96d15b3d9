//! Loan management service

use crate::{
    error::AppResult,
    models::{
        book::Book,
        loan::{Loan, LoanDetails},
        user::User,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow a book for the given user
    pub async fn borrow_book(&self, book_id: i64, user: &User) -> AppResult<Loan> {
        let loan = self.repository.loans.borrow(book_id, user.id).await?;
        tracing::info!(
            "User {} borrowed book {} (loan {})",
            user.id,
            book_id,
            loan.id
        );
        Ok(loan)
    }

    /// Return a book; only the borrower or an admin may do so
    pub async fn return_book(&self, book_id: i64, user: &User) -> AppResult<Book> {
        let book = self
            .repository
            .loans
            .return_book(book_id, user.id, user.is_admin)
            .await?;
        tracing::info!("User {} returned book {}", user.id, book_id);
        Ok(book)
    }

    /// List all loans recorded for a user, oldest first
    pub async fn get_user_loans(&self, user_id: i64) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.get_user_loans(user_id).await
    }
}
