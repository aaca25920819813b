use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::DomainError;
use crate::services::reader_service;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReaderRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BuyBookRequest {
    pub reader_name: String,
    pub book_name: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReaderQuery {
    pub reader_name: String,
}

#[utoipa::path(
    post,
    path = "/api/readers",
    request_body = CreateReaderRequest,
    responses(
        (status = 201, description = "Reader created")
    )
)]
pub async fn create_reader(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateReaderRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let reader = reader_service::create_reader(&db, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(reader)))
}

#[utoipa::path(
    patch,
    path = "/api/readers",
    request_body = BuyBookRequest,
    responses(
        (status = 200, description = "Book handed to the reader"),
        (status = 404, description = "Reader or book not found")
    )
)]
pub async fn buy_book(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<BuyBookRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let reader = reader_service::buy_book(&db, &payload.reader_name, &payload.book_name).await?;
    Ok(Json(reader))
}

#[utoipa::path(
    get,
    path = "/api/readers",
    params(ReaderQuery),
    responses(
        (status = 200, description = "Reader with books and items, or null")
    )
)]
pub async fn get_reader(
    State(db): State<DatabaseConnection>,
    Query(query): Query<ReaderQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let reader = reader_service::get_reader(&db, &query.reader_name).await?;
    Ok(Json(reader))
}

#[utoipa::path(
    delete,
    path = "/api/readers/{reader_name}",
    params(
        ("reader_name" = String, Path, description = "Exact reader name")
    ),
    responses(
        (status = 200, description = "Reader and everything they owned deleted"),
        (status = 404, description = "Reader not found")
    )
)]
pub async fn delete_reader(
    State(db): State<DatabaseConnection>,
    Path(reader_name): Path<String>,
) -> Result<impl IntoResponse, DomainError> {
    reader_service::delete_reader(&db, &reader_name).await?;
    Ok(Json(json!({ "message": "Reader deleted" })))
}
