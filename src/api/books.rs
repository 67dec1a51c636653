//! Book (catalog) endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookInput, BookPatch, BookQuery},
        pagination::PageRequest,
        price::YearAvgPrice,
    },
    AppState,
};

use super::AuthenticatedUser;

const BOOKS_PATH: &str = "/api/books/";

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Total number of records
    pub count: i64,
    /// Current page number
    pub page: i64,
    /// Records per page
    pub page_size: i64,
    /// Link to the next page
    pub next: Option<String>,
    /// Link to the previous page
    pub previous: Option<String>,
    /// Records on this page
    pub results: Vec<T>,
}

impl<T> PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(results: Vec<T>, total: i64, page: &PageRequest, base_path: &str) -> Self {
        let link = |n: i64| format!("{}?page={}&page_size={}", base_path, n, page.page_size);
        Self {
            count: total,
            page: page.page,
            page_size: page.page_size,
            next: page.has_next(total).then(|| link(page.page + 1)),
            previous: page.has_previous().then(|| link(page.page - 1)),
            results,
        }
    }
}

fn book_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::NotFound("Book not found.".to_string()))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value)
        .map_err(|e| AppError::Validation(e.body_text()))
}

/// List books with pagination
#[utoipa::path(
    get,
    path = "/api/books/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookQuery),
    responses(
        (status = 200, description = "One page of books", body = PaginatedResponse<Book>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Invalid page", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    let page = PageRequest::resolve(
        query.page.as_deref(),
        query.page_size.as_deref(),
        &state.config.pagination,
    )?;

    let (books, total) = state.services.catalog.list_books(&page).await?;
    Ok(Json(PaginatedResponse::new(books, total, &page, BOOKS_PATH)))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/api/books/",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    body: Result<Json<BookInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = json_body(body)?;

    let created = state.services.catalog.create_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/api/books/{id}/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<Book>> {
    let id = book_id(path)?;

    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Replace an existing book
#[utoipa::path(
    put,
    path = "/api/books/{id}/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<BookInput>, JsonRejection>,
) -> AppResult<Json<Book>> {
    let id = book_id(path)?;
    let book = json_body(body)?;

    let updated = state.services.catalog.update_book(id, book).await?;
    Ok(Json(updated))
}

/// Update some fields of an existing book
#[utoipa::path(
    patch,
    path = "/api/books/{id}/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = BookPatch,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn patch_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<BookPatch>, JsonRejection>,
) -> AppResult<Json<Book>> {
    let id = book_id(path)?;
    let patch = json_body(body)?;

    let updated = state.services.catalog.patch_book(id, patch).await?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/api/books/{id}/",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<StatusCode> {
    let id = book_id(path)?;

    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Average price of the books published in a given year
#[utoipa::path(
    get,
    path = "/api/books/avg-price/{year}/",
    tag = "books",
    params(
        ("year" = String, Path, description = "Publication year")
    ),
    responses(
        (status = 200, description = "Average price for the year", body = Vec<YearAvgPrice>),
        (status = 400, description = "Invalid year", body = crate::error::ErrorResponse),
        (status = 404, description = "No books published that year", body = crate::error::ErrorResponse),
        (status = 500, description = "Document store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn avg_price_by_year(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> AppResult<Json<Vec<YearAvgPrice>>> {
    let results = state.services.stats.avg_price_by_year(&year).await?;
    Ok(Json(results))
}
