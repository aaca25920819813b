use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::DomainError;
use crate::services::reader_service;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateItemRequest {
    pub name: String,
    /// Owner of the new item; leave out for an unowned item
    pub reader_name: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created"),
        (status = 404, description = "Reader not found")
    )
)]
pub async fn create_item(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let item =
        reader_service::create_item(&db, &payload.name, payload.reader_name.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(item)))
}
