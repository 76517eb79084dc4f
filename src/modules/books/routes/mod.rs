//! HTTP handlers for the books resource. The `#[utoipa::path]` annotations
//! are the source of the module's OpenAPI fragment.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use folio_http::error::{AppError, ErrorBody};
use utoipa_axum::{router::OpenApiRouter, routes};

use super::models::{Book, BookId, BookPayload};
use super::repository::BookRepository;
use super::validation::validate;

/// Router state: the store every handler reads and mutates.
pub type BooksState = Arc<dyn BookRepository>;

const NOT_FOUND: &str = "Book not found";

/// Book routes together with their documentation
pub fn router() -> OpenApiRouter<BooksState> {
    OpenApiRouter::new()
        .routes(routes!(list_books, create_book))
        .routes(routes!(health_check))
        .routes(routes!(get_book, update_book, delete_book))
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "Books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input", body = ErrorBody)
    )
)]
async fn create_book(
    State(repository): State<BooksState>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(payload) = payload.map_err(malformed_body)?;
    let draft = validate(payload)?;

    let book = repository.create(draft).await?;
    tracing::info!(book_id = book.id, title = %book.title, "book created");

    Ok((StatusCode::CREATED, Json(book)))
}

/// Get all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "Books",
    responses((status = 200, description = "List of books", body = [Book]))
)]
async fn list_books(State(repository): State<BooksState>) -> Result<Json<Vec<Book>>, AppError> {
    Ok(Json(repository.list().await?))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "Books",
    params(("id" = u64, Path, description = "Book identifier")),
    responses(
        (status = 200, description = "Book found", body = Book),
        (status = 404, description = "Book not found", body = ErrorBody)
    )
)]
async fn get_book(
    State(repository): State<BooksState>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(id)?;

    repository
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND))
}

/// Update a book
///
/// Replaces every field except the id; an omitted `publishedYear` is cleared.
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "Books",
    params(("id" = u64, Path, description = "Book identifier")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 404, description = "Book not found", body = ErrorBody)
    )
)]
async fn update_book(
    State(repository): State<BooksState>,
    id: Result<Path<BookId>, PathRejection>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let id = book_id(id)?;

    // Unknown ids answer 404 before the body is looked at.
    if !repository.exists(id).await? {
        return Err(AppError::not_found(NOT_FOUND));
    }

    let Json(payload) = payload.map_err(malformed_body)?;
    let draft = validate(payload)?;

    let book = repository
        .replace(id, draft)
        .await?
        .ok_or_else(|| AppError::not_found(NOT_FOUND))?;
    tracing::info!(book_id = book.id, "book updated");

    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "Books",
    params(("id" = u64, Path, description = "Book identifier")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = ErrorBody)
    )
)]
async fn delete_book(
    State(repository): State<BooksState>,
    id: Result<Path<BookId>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = book_id(id)?;

    if !repository.delete(id).await? {
        return Err(AppError::not_found(NOT_FOUND));
    }

    tracing::info!(book_id = id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Books health check
#[utoipa::path(
    get,
    path = "/books/health",
    tag = "Books",
    responses((status = 200, description = "OK", body = String, content_type = "text/plain"))
)]
async fn health_check() -> &'static str {
    "books module is healthy"
}

/// An id that is not a non-negative integer cannot name a stored book.
fn book_id(id: Result<Path<BookId>, PathRejection>) -> Result<BookId, AppError> {
    match id {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            tracing::debug!(%rejection, "unparseable book id");
            Err(AppError::not_found(NOT_FOUND))
        }
    }
}

fn malformed_body(rejection: JsonRejection) -> AppError {
    AppError::bad_request(rejection.body_text())
}
