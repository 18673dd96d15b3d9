//! User model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub full_name: Option<String>,
    pub is_admin: bool,
    pub crea_date: DateTime<Utc>,
}

/// Signup request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct Signup {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub full_name: Option<String>,
}

/// Login form body (OAuth2 password flow style)
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Token response for a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i64,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(
        &self,
        secret: &str,
        algorithm: jsonwebtoken::Algorithm,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::new(algorithm),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a JWT token
    pub fn from_token(
        token: &str,
        secret: &str,
        algorithm: jsonwebtoken::Algorithm,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(algorithm),
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::Algorithm;

    fn claims_for(sub: &str, ttl_secs: i64) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: sub.to_string(),
            user_id: 1,
            is_admin: false,
            exp: now + ttl_secs,
            iat: now,
        }
    }

    #[test]
    fn token_round_trip_preserves_subject() {
        let claims = claims_for("john_doe", 900);
        let token = claims.create_token("secret", Algorithm::HS256).unwrap();
        let parsed = UserClaims::from_token(&token, "secret", Algorithm::HS256).unwrap();
        assert_eq!(parsed.sub, "john_doe");
        assert_eq!(parsed.user_id, 1);
        assert!(!parsed.is_admin);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Expiry well past the default validation leeway
        let claims = claims_for("john_doe", -300);
        let token = claims.create_token("secret", Algorithm::HS256).unwrap();
        assert!(UserClaims::from_token(&token, "secret", Algorithm::HS256).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = claims_for("john_doe", 900);
        let token = claims.create_token("secret", Algorithm::HS256).unwrap();
        assert!(UserClaims::from_token(&token, "other-secret", Algorithm::HS256).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let claims = claims_for("john_doe", 900);
        let token = claims.create_token("secret", Algorithm::HS256).unwrap();
        let mut tampered = token.clone();
        tampered.truncate(token.len() - 2);
        assert!(UserClaims::from_token(&tampered, "secret", Algorithm::HS256).is_err());
    }
}
