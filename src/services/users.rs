//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use jsonwebtoken::Algorithm;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{Signup, User, UserClaims},
    repository::Repository,
};

/// Hash a password with a per-call random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored hash; malformed hashes verify false
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    fn algorithm(&self) -> AppResult<Algorithm> {
        self.config.jwt_algorithm.parse().map_err(|_| {
            AppError::Internal(format!(
                "Unknown JWT algorithm: {}",
                self.config.jwt_algorithm
            ))
        })
    }

    /// Register a new user account
    pub async fn signup(&self, signup: Signup) -> AppResult<User> {
        signup
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self
            .repository
            .users
            .get_by_username(&signup.username)
            .await?
            .is_some()
        {
            return Err(AppError::Duplicate("Username already registered".to_string()));
        }
        if let Some(ref email) = signup.email {
            if self.repository.users.email_exists(email).await? {
                return Err(AppError::Duplicate("Email already registered".to_string()));
            }
        }

        let password_hash = hash_password(&signup.password)?;
        let user = self
            .repository
            .users
            .create(
                &signup.username,
                signup.email.as_deref(),
                &password_hash,
                signup.full_name.as_deref(),
                false,
            )
            .await?;

        tracing::info!("Registered user {} (id {})", user.username, user.id);
        Ok(user)
    }

    /// Authenticate by username/password and return a signed bearer token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<String> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Incorrect username or password".to_string())
            })?;

        if !verify_password(password, &user.password) {
            return Err(AppError::Authentication(
                "Incorrect username or password".to_string(),
            ));
        }

        self.create_token_for(&user)
    }

    /// Build and sign claims for a user with the configured TTL
    pub fn create_token_for(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            is_admin: user.is_admin,
            exp: now + self.config.token_ttl_minutes * 60,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret, self.algorithm()?)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Resolve the user behind a bearer token
    pub async fn resolve_token(&self, token: &str) -> AppResult<User> {
        let claims = UserClaims::from_token(token, &self.config.jwt_secret, self.algorithm()?)
            .map_err(|e| AppError::Authentication(format!("Invalid token: {}", e)))?;

        self.repository
            .users
            .get_by_username(&claims.sub)
            .await?
            .ok_or_else(|| AppError::Authentication("Could not validate credentials".to_string()))
    }

    /// Seed the bootstrap admin account when configured and absent
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        let Some(ref password) = self.config.bootstrap_admin_password else {
            tracing::warn!("No bootstrap admin password configured; no admin account seeded");
            return Ok(());
        };

        let login = &self.config.bootstrap_admin_login;
        if self.repository.users.get_by_username(login).await?.is_some() {
            return Ok(());
        }

        let password_hash = hash_password(password)?;
        let admin = self
            .repository
            .users
            .create(login, None, &password_hash, Some("Administrator"), true)
            .await?;

        tracing::info!("Seeded bootstrap admin account {} (id {})", login, admin.id);
        Ok(())
    }
}
