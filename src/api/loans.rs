//! Loan endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::Book,
        loan::{CreateLoan, Loan, LoanDetails},
    },
};

use super::AuthenticatedUser;

/// Borrow a book by ID
#[utoipa::path(
    post,
    path = "/books/{id}/borrow",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "No available copies"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(book_id): Path<i64>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let loan = state.services.loans.borrow_book(book_id, &user).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Borrow a book via a loan request body
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "No available copies"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(request): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let loan = state
        .services
        .loans
        .borrow_book(request.book_id, &user)
        .await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/books/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = Book),
        (status = 400, description = "Book is not currently borrowed"),
        (status = 403, description = "Caller is not the borrower"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(book_id): Path<i64>,
) -> AppResult<Json<Book>> {
    let book = state.services.loans.return_book(book_id, &user).await?;
    Ok(Json(book))
}

/// List the authenticated user's loans
#[utoipa::path(
    get,
    path = "/users/me/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User's loans", body = Vec<LoanDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanDetails>>> {
    let loans = state.services.loans.get_user_loans(user.id).await?;
    Ok(Json(loans))
}
