// src/models/book.rs

use serde::{Deserialize, Serialize};
use sqlx::{PgPool, prelude::FromRow};
use url::Url;
use validator::Validate;

use crate::{
    error::{AppError, is_unique_violation},
    utils::{
        schema::{FieldKind, FieldRule},
        validated_json::Schema,
    },
};

/// Represents the 'books' table in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    /// Primary key. Never changes after creation.
    pub isbn: String,

    pub amazon_url: Option<String>,

    pub author: String,

    pub language: String,

    pub pages: i32,

    pub publisher: String,

    pub title: String,

    /// Publication year.
    pub year: i32,
}

/// DTO for creating a new book. The caller supplies the isbn.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub isbn: String,
    #[validate(custom(function = validate_url_string))]
    pub amazon_url: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub language: String,
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub pages: i32,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub publisher: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    pub year: i32,
}

/// DTO for replacing a book. Every field but the isbn is required; an isbn in the
/// body is only accepted when it matches the one in the path.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBookRequest {
    pub isbn: Option<String>,
    #[validate(custom(function = validate_url_string))]
    pub amazon_url: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub language: String,
    #[validate(range(min = 1, message = "must be a positive integer"))]
    pub pages: i32,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub publisher: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    pub year: i32,
}

const CREATE_BOOK_RULES: &[FieldRule] = &[
    FieldRule::required("isbn", FieldKind::String),
    FieldRule::optional("amazon_url", FieldKind::String),
    FieldRule::required("author", FieldKind::String),
    FieldRule::required("language", FieldKind::String),
    FieldRule::required("pages", FieldKind::Integer),
    FieldRule::required("publisher", FieldKind::String),
    FieldRule::required("title", FieldKind::String),
    FieldRule::required("year", FieldKind::Integer),
];

const UPDATE_BOOK_RULES: &[FieldRule] = &[
    FieldRule::optional("isbn", FieldKind::String),
    FieldRule::optional("amazon_url", FieldKind::String),
    FieldRule::required("author", FieldKind::String),
    FieldRule::required("language", FieldKind::String),
    FieldRule::required("pages", FieldKind::Integer),
    FieldRule::required("publisher", FieldKind::String),
    FieldRule::required("title", FieldKind::String),
    FieldRule::required("year", FieldKind::Integer),
];

impl Schema for CreateBookRequest {
    fn rules() -> &'static [FieldRule] {
        CREATE_BOOK_RULES
    }
}

impl Schema for UpdateBookRequest {
    fn rules() -> &'static [FieldRule] {
        UPDATE_BOOK_RULES
    }
}

/// Validates that a string is a correctly formatted URL.
fn validate_url_string(url: &str) -> Result<(), validator::ValidationError> {
    if Url::parse(url).is_err() {
        return Err(validator::ValidationError::new("invalid_url")
            .with_message("must be a valid URL".into()));
    }
    Ok(())
}

impl Book {
    /// Returns every book ordered by title.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Book>, AppError> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT isbn, amazon_url, author, language, pages, publisher, title, year
            FROM books
            ORDER BY title ASC
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list books: {:?}", e);
            AppError::from(e)
        })?;

        Ok(books)
    }

    pub async fn get_by_isbn(pool: &PgPool, isbn: &str) -> Result<Book, AppError> {
        sqlx::query_as::<_, Book>(
            r#"
            SELECT isbn, amazon_url, author, language, pages, publisher, title, year
            FROM books
            WHERE isbn = $1
            "#,
        )
        .bind(isbn)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch book '{}': {:?}", isbn, e);
            AppError::from(e)
        })?
        .ok_or_else(|| not_found(isbn))
    }

    /// Inserts a validated book and returns the stored row.
    ///
    /// A second book with the same isbn is reported as `Conflict`.
    pub async fn create(pool: &PgPool, data: CreateBookRequest) -> Result<Book, AppError> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (isbn, amazon_url, author, language, pages, publisher, title, year)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING isbn, amazon_url, author, language, pages, publisher, title, year
            "#,
        )
        .bind(&data.isbn)
        .bind(&data.amazon_url)
        .bind(&data.author)
        .bind(&data.language)
        .bind(data.pages)
        .bind(&data.publisher)
        .bind(&data.title)
        .bind(data.year)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Book with isbn '{}' already exists", data.isbn))
            } else {
                tracing::error!("Failed to create book: {:?}", e);
                AppError::from(e)
            }
        })
    }

    /// Replaces every column except the isbn.
    pub async fn update(
        pool: &PgPool,
        isbn: &str,
        data: UpdateBookRequest,
    ) -> Result<Book, AppError> {
        if let Some(body_isbn) = &data.isbn {
            if body_isbn != isbn {
                return Err(AppError::Validation(vec![
                    "'isbn' cannot be changed".to_string(),
                ]));
            }
        }

        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET amazon_url = $1,
                author = $2,
                language = $3,
                pages = $4,
                publisher = $5,
                title = $6,
                year = $7
            WHERE isbn = $8
            RETURNING isbn, amazon_url, author, language, pages, publisher, title, year
            "#,
        )
        .bind(&data.amazon_url)
        .bind(&data.author)
        .bind(&data.language)
        .bind(data.pages)
        .bind(&data.publisher)
        .bind(&data.title)
        .bind(data.year)
        .bind(isbn)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update book '{}': {:?}", isbn, e);
            AppError::from(e)
        })?
        .ok_or_else(|| not_found(isbn))
    }

    pub async fn remove(pool: &PgPool, isbn: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete book '{}': {:?}", isbn, e);
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(not_found(isbn));
        }

        Ok(())
    }
}

fn not_found(isbn: &str) -> AppError {
    AppError::NotFound(format!("There is no book with an isbn of '{}'", isbn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validated_json::parse;
    use serde_json::json;

    fn valid_book() -> serde_json::Value {
        json!({
            "isbn": "678910",
            "author": "Jennytest",
            "language": "English",
            "pages": 100,
            "publisher": "Jennytest Ng",
            "title": "Test",
            "year": 2021
        })
    }

    fn validation_errors(result: Result<impl std::fmt::Debug, AppError>) -> Vec<String> {
        match result {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn create_request_accepts_full_payload() {
        let request: CreateBookRequest = parse(valid_book()).unwrap();
        assert_eq!(request.isbn, "678910");
        assert_eq!(request.pages, 100);
        assert!(request.amazon_url.is_none());
    }

    #[test]
    fn create_request_requires_isbn() {
        let errors = validation_errors(parse::<CreateBookRequest>(json!({"author": "Not an author"})));
        assert!(errors.contains(&"'isbn' is required".to_string()));
        assert!(errors.contains(&"'title' is required".to_string()));
        assert!(!errors.iter().any(|e| e.starts_with("'author'")));
    }

    #[test]
    fn create_request_rejects_string_pages() {
        let mut body = valid_book();
        body["pages"] = json!("100");
        let errors = validation_errors(parse::<CreateBookRequest>(body));
        assert_eq!(errors, vec!["'pages' must be an integer"]);
    }

    #[test]
    fn create_request_rejects_non_positive_pages() {
        let mut body = valid_book();
        body["pages"] = json!(0);
        let errors = validation_errors(parse::<CreateBookRequest>(body));
        assert_eq!(errors, vec!["'pages' must be a positive integer"]);
    }

    #[test]
    fn create_request_rejects_bad_amazon_url() {
        let mut body = valid_book();
        body["amazon_url"] = json!("not a url");
        let errors = validation_errors(parse::<CreateBookRequest>(body));
        assert_eq!(errors, vec!["'amazon_url' must be a valid URL"]);
    }

    #[test]
    fn create_request_accepts_long_text_fields() {
        let mut body = valid_book();
        body["isbn"] = json!("9".repeat(33));
        body["author"] = json!("a".repeat(201));
        body["language"] = json!("l".repeat(51));
        body["title"] = json!("t".repeat(501));
        body["amazon_url"] = json!(format!("https://amazon.com/{}", "p".repeat(600)));
        let request: CreateBookRequest = parse(body).unwrap();
        assert_eq!(request.isbn.len(), 33);
        assert_eq!(request.title.len(), 501);
    }

    #[test]
    fn create_request_rejects_empty_author() {
        let mut body = valid_book();
        body["author"] = json!("");
        let errors = validation_errors(parse::<CreateBookRequest>(body));
        assert_eq!(errors, vec!["'author' must not be empty"]);
    }

    #[test]
    fn create_request_accepts_null_amazon_url() {
        let mut body = valid_book();
        body["amazon_url"] = serde_json::Value::Null;
        let request: CreateBookRequest = parse(body).unwrap();
        assert!(request.amazon_url.is_none());
    }

    #[test]
    fn pages_beyond_column_range_is_bad_request() {
        let mut body = valid_book();
        body["pages"] = json!(5_000_000_000i64);
        match parse::<CreateBookRequest>(body) {
            Err(AppError::BadRequest(_)) => {}
            other => panic!("expected bad request, got {:?}", other),
        }
    }

    #[test]
    fn update_request_does_not_require_isbn() {
        let mut body = valid_book();
        body.as_object_mut().unwrap().remove("isbn");
        let request: UpdateBookRequest = parse(body).unwrap();
        assert!(request.isbn.is_none());
        assert_eq!(request.author, "Jennytest");
    }

    #[test]
    fn update_request_requires_other_fields() {
        let errors = validation_errors(parse::<UpdateBookRequest>(json!({"author": "Jennyupdate"})));
        assert_eq!(
            errors,
            vec![
                "'language' is required",
                "'pages' is required",
                "'publisher' is required",
                "'title' is required",
                "'year' is required",
            ]
        );
    }
}
