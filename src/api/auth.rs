//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Form, Json};

use crate::{
    error::AppResult,
    models::user::{LoginForm, Signup, TokenResponse, User},
};

use super::AuthenticatedUser;

/// Register a new user account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = Signup,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Username or email already registered")
    )
)]
pub async fn signup(
    State(state): State<crate::AppState>,
    Json(signup): Json<Signup>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state.services.users.signup(signup).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in with username and password, returning a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Incorrect username or password")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Json<TokenResponse>> {
    let access_token = state
        .services
        .users
        .authenticate(&form.username, &form.password)
        .await?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// Get the currently authenticated user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
