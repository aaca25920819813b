pub mod books;
pub mod health;
pub mod items;
pub mod readers;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::domain::DomainError;

pub fn api_router(db: DatabaseConnection) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        // GET takes a book name, PUT a book id
        .route("/books/:book", get(books::get_book).put(books::update_book))
        // Readers
        .route(
            "/readers",
            get(readers::get_reader)
                .post(readers::create_reader)
                .patch(readers::buy_book),
        )
        .route("/readers/:reader_name", delete(readers::delete_reader))
        // Items
        .route("/items", post(items::create_item))
        .with_state(db)
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = match &self {
            DomainError::ReaderNotFound | DomainError::BookNotFound | DomainError::NotFound => {
                StatusCode::NOT_FOUND
            }
            DomainError::LogicalOperatorMustBeGiven => StatusCode::BAD_REQUEST,
            DomainError::Database(_) => {
                tracing::error!("Request failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
