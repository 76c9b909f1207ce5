use axum::{extract::Path, Json};
use serde_json::json;

use crate::domain::a002_product;

/// GET /api/product
pub async fn list_all(
) -> Result<Json<Vec<contracts::domain::a002_product::aggregate::Product>>, axum::http::StatusCode>
{
    match a002_product::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/product/:id
pub async fn get_by_id(
    Path(id): Path<i64>,
) -> Result<Json<contracts::domain::a002_product::aggregate::Product>, axum::http::StatusCode> {
    match a002_product::service::get_by_id(id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/product
pub async fn upsert(
    Json(dto): Json<contracts::domain::a002_product::aggregate::ProductDto>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    let result = match dto.id {
        Some(id) => a002_product::service::update(dto).await.map(|_| id),
        None => a002_product::service::create(dto).await,
    };

    match result {
        Ok(id) => Ok(Json(json!({"id": id}))),
        Err(e) => {
            tracing::error!("Failed to save product: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// DELETE /api/product/:id
pub async fn delete(Path(id): Path<i64>) -> Result<(), axum::http::StatusCode> {
    match a002_product::service::delete(id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
