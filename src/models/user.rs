//! API user model and JWT claims

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account allowed to obtain API tokens
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Which half of a token pair a JWT is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i64,
    pub token_type: TokenKind,
    pub jti: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Claims for a fresh token of the given kind, valid for `ttl` from now
    pub fn new(user: &User, token_type: TokenKind, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user.username.clone(),
            user_id: user.id,
            token_type,
            jti: Uuid::new_v4(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
