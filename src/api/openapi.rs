//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblioteca API",
        version = "1.0.0",
        description = "Book catalog REST API"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::obtain_token_pair,
        auth::obtain_auth_token,
        auth::refresh_token,
        // Books
        books::list_books,
        books::create_book,
        books::get_book,
        books::update_book,
        books::patch_book,
        books::delete_book,
        books::avg_price_by_year,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::TokenPairResponse,
            auth::RefreshRequest,
            auth::AccessTokenResponse,
            // Books
            crate::models::book::Book,
            crate::models::book::BookInput,
            crate::models::book::BookPatch,
            crate::models::book::Genre,
            crate::models::price::YearAvgPrice,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Token authentication"),
        (name = "books", description = "Book catalog")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
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

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger").url("/api/schema/", ApiDoc::openapi()))
}
