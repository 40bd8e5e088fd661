// src/handlers/books.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;

use crate::{
    error::AppError,
    models::book::{Book, CreateBookRequest, UpdateBookRequest},
    utils::validated_json::ValidatedJson,
};

/// Lists all books, ordered by title.
pub async fn list_books(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let books = Book::list_all(&pool).await?;

    Ok(Json(json!({ "books": books })))
}

/// Retrieves a single book by isbn.
pub async fn get_book(
    State(pool): State<PgPool>,
    Path(isbn): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let book = Book::get_by_isbn(&pool, &isbn).await?;

    Ok(Json(json!({ "book": book })))
}

/// Creates a new book.
/// Returns 201 Created and the stored book.
pub async fn create_book(
    State(pool): State<PgPool>,
    ValidatedJson(payload): ValidatedJson<CreateBookRequest>,
) -> Result<impl IntoResponse, AppError> {
    let book = Book::create(&pool, payload).await?;
    tracing::info!("Created book '{}'", book.isbn);

    Ok((StatusCode::CREATED, Json(json!({ "book": book }))))
}

/// Replaces every field of a book except its isbn.
pub async fn update_book(
    State(pool): State<PgPool>,
    Path(isbn): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateBookRequest>,
) -> Result<impl IntoResponse, AppError> {
    let book = Book::update(&pool, &isbn, payload).await?;

    Ok(Json(json!({ "book": book })))
}

/// Deletes a book by isbn.
pub async fn delete_book(
    State(pool): State<PgPool>,
    Path(isbn): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Book::remove(&pool, &isbn).await?;
    tracing::info!("Deleted book '{}'", isbn);

    Ok(Json(json!({ "message": "Book deleted" })))
}
