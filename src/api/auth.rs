//! Authentication endpoints

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    AppState,
};

const CREDENTIALS_REQUIRED: &str = "Username and password are required.";
const NO_ACTIVE_ACCOUNT: &str = "No active account found with the given credentials";

/// Login request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Both fields present and non-empty
    fn credentials(&self) -> AppResult<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok((username, password))
            }
            _ => Err(AppError::BadRequest(CREDENTIALS_REQUIRED.to_string())),
        }
    }
}

/// Access + refresh token pair
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPairResponse {
    pub refresh: String,
    pub access: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access: String,
}

fn login_body(request: Result<Json<LoginRequest>, JsonRejection>) -> AppResult<LoginRequest> {
    request
        .map(|Json(body)| body)
        .map_err(|_| AppError::BadRequest(CREDENTIALS_REQUIRED.to_string()))
}

/// Obtain a token pair. Bad credentials and inactive accounts are both 401.
#[utoipa::path(
    post,
    path = "/api/token/",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPairResponse),
        (status = 400, description = "Missing username or password", body = crate::error::ErrorResponse),
        (status = 401, description = "No active account for these credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn obtain_token_pair(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<TokenPairResponse>> {
    let request = login_body(request)?;
    let (username, password) = request.credentials()?;

    let user = state
        .services
        .auth
        .authenticate(username, password)
        .await
        .map_err(|e| match e {
            AppError::Authentication(_) | AppError::InactiveUser(_) => {
                AppError::Authentication(NO_ACTIVE_ACCOUNT.to_string())
            }
            other => other,
        })?;

    let tokens = state.services.auth.issue_tokens(&user)?;
    Ok(Json(TokenPairResponse {
        refresh: tokens.refresh,
        access: tokens.access,
    }))
}

/// Obtain a token pair, distinguishing inactive accounts (400) from bad
/// credentials (401)
#[utoipa::path(
    post,
    path = "/api/auth-token/",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPairResponse),
        (status = 400, description = "Missing username or password, or inactive user", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn obtain_auth_token(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<TokenPairResponse>> {
    let request = login_body(request)?;
    let (username, password) = request.credentials()?;

    let user = state.services.auth.authenticate(username, password).await?;
    tracing::info!("Issued tokens for {}", user.username);

    let tokens = state.services.auth.issue_tokens(&user)?;
    Ok(Json(TokenPairResponse {
        refresh: tokens.refresh,
        access: tokens.access,
    }))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/api/token/refresh/",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 400, description = "Missing refresh token", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid or expired refresh token, or inactive account", body = crate::error::ErrorResponse)
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    request: Result<Json<RefreshRequest>, JsonRejection>,
) -> AppResult<Json<AccessTokenResponse>> {
    let refresh = request
        .ok()
        .and_then(|Json(body)| body.refresh)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::BadRequest("Refresh token is required.".to_string()))?;

    let access = state.services.auth.refresh(&refresh).await?;
    Ok(Json(AccessTokenResponse { access }))
}
