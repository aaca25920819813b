use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::DomainError;
use crate::services::book_service::{self, BookChanges};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookRequest {
    pub name: String,
    pub author: String,
    pub release_year: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBookRequest {
    pub name: Option<String>,
    pub author: Option<String>,
    pub release_year: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/books",
    responses(
        (status = 200, description = "All books ordered by id")
    )
)]
pub async fn list_books(
    State(db): State<DatabaseConnection>,
) -> Result<impl IntoResponse, DomainError> {
    let books = book_service::get_all_books(&db).await?;
    Ok(Json(books))
}

#[utoipa::path(
    post,
    path = "/api/books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created")
    )
)]
pub async fn create_book(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateBookRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let book =
        book_service::create_book(&db, &payload.name, &payload.author, payload.release_year)
            .await?;
    Ok((StatusCode::CREATED, Json(book)))
}

#[utoipa::path(
    get,
    path = "/api/books/{book_name}",
    params(
        ("book_name" = String, Path, description = "Exact book name")
    ),
    responses(
        (status = 200, description = "The book, or null when no book has that name")
    )
)]
pub async fn get_book(
    State(db): State<DatabaseConnection>,
    Path(book_name): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    let book = book_service::get_book(&db, &book_name).await?;
    Ok(Json(book))
}

#[utoipa::path(
    put,
    path = "/api/books/{book_id}",
    request_body = UpdateBookRequest,
    params(
        ("book_id" = i32, Path, description = "Book id")
    ),
    responses(
        (status = 200, description = "Book updated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(db): State<DatabaseConnection>,
    Path(book_id): Path<i32>,
    Json(payload): Json<UpdateBookRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let changes = BookChanges {
        name: payload.name,
        author: payload.author,
        release_year: payload.release_year,
    };
    let book = book_service::update_book(&db, book_id, changes).await?;
    Ok(Json(book))
}
