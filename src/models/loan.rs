//! Loan model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::BookSummary;

/// Loan model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub loan_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

/// Loan with the borrowed book embedded, for list display.
/// The book is absent when it has been deleted from the catalog since;
/// the loan itself stays on the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub loan_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub book: Option<BookSummary>,
}

/// Borrow request for the POST /loans form of the endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    pub book_id: i64,
}
