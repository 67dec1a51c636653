//! API handlers for Biblioteca REST endpoints

pub mod auth;
pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::user::{TokenKind, UserClaims},
    AppState,
};

/// Extractor for authenticated user from a bearer access token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Authentication("Authentication credentials were not provided.".to_string())
            })?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token.trim(), &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        if claims.token_type != TokenKind::Access {
            return Err(AppError::Authentication("Token has wrong type".to_string()));
        }

        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health/", get(health::health_check))
        .route("/ready/", get(health::readiness_check))
        // Authentication
        .route("/token/", post(auth::obtain_token_pair))
        .route("/token/refresh/", post(auth::refresh_token))
        .route("/auth-token/", post(auth::obtain_auth_token))
        // Books
        .route("/books/", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id/",
            get(books::get_book)
                .put(books::update_book)
                .patch(books::patch_book)
                .delete(books::delete_book),
        )
        .route("/books/avg-price/:year/", get(books::avg_price_by_year))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
