//! Authentication service: credential checks and token issuance

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Duration;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{TokenKind, User, UserClaims},
    repository::Repository,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials.";

/// Signed access/refresh pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Check a username/password pair. Unknown users and wrong passwords are
    /// indistinguishable; a correct password on a disabled account is
    /// reported as `InactiveUser`.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&user.password, password)? {
            tracing::info!("Rejected login for {}", username);
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        if !user.is_active {
            return Err(AppError::InactiveUser("User is inactive.".to_string()));
        }

        Ok(user)
    }

    /// Issue an access token and a refresh token for a user
    pub fn issue_tokens(&self, user: &User) -> AppResult<TokenPair> {
        let access = UserClaims::new(user, TokenKind::Access, self.access_ttl());
        let refresh = UserClaims::new(user, TokenKind::Refresh, self.refresh_ttl());

        Ok(TokenPair {
            access: self.sign(&access)?,
            refresh: self.sign(&refresh)?,
        })
    }

    /// Exchange a refresh token for a new access token. The account must
    /// still exist and be active.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<String> {
        let claims = self.refresh_claims(refresh_token)?;

        let user = self
            .repository
            .users
            .get_by_id(claims.user_id)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| AppError::Authentication("User not found or inactive".to_string()))?;

        self.sign(&UserClaims::new(&user, TokenKind::Access, self.access_ttl()))
    }

    /// Decode a token that must be an unexpired refresh token
    fn refresh_claims(&self, token: &str) -> AppResult<UserClaims> {
        let claims = UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|_| AppError::Authentication("Token is invalid or expired".to_string()))?;

        if claims.token_type != TokenKind::Refresh {
            return Err(AppError::Authentication(
                "Token has wrong type".to_string(),
            ));
        }
        Ok(claims)
    }

    /// Create an active user (used by the seeder)
    pub async fn create_user(&self, username: &str, password: &str) -> AppResult<User> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Username and password are required.".to_string(),
            ));
        }
        if self.repository.users.username_exists(username).await? {
            return Err(AppError::Conflict(format!("User {} already exists", username)));
        }

        let hash = hash_password(password)?;
        self.repository.users.create(username, &hash).await
    }

    fn sign(&self, claims: &UserClaims) -> AppResult<String> {
        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn access_ttl(&self) -> Duration {
        Duration::minutes(self.config.access_token_minutes)
    }

    fn refresh_ttl(&self) -> Duration {
        Duration::hours(self.config.refresh_token_hours)
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
