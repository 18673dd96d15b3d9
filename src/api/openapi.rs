//! OpenAPI documentation

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Elibris API",
        version = "0.1.0",
        description = "Library Lending REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::login,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::delete_book,
        // Loans
        loans::borrow_book,
        loans::create_loan,
        loans::return_book,
        loans::my_loans,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            crate::models::user::User,
            crate::models::user::Signup,
            crate::models::user::LoginForm,
            crate::models::user::TokenResponse,
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::CreateBook,
            crate::models::book::BookQuery,
            crate::models::loan::Loan,
            crate::models::loan::LoanDetails,
            crate::models::loan::CreateLoan,
            health::HealthResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Authentication"),
        (name = "books", description = "Book catalog"),
        (name = "loans", description = "Book lending"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Registers the bearer token security scheme
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the Swagger UI router serving the OpenAPI document
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
