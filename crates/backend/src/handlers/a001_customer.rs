use axum::{extract::Path, Json};
use serde_json::json;

use crate::domain::a001_customer;

/// GET /api/customer
pub async fn list_all(
) -> Result<Json<Vec<contracts::domain::a001_customer::aggregate::Customer>>, axum::http::StatusCode>
{
    match a001_customer::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/customer/:id
pub async fn get_by_id(
    Path(id): Path<i64>,
) -> Result<Json<contracts::domain::a001_customer::aggregate::Customer>, axum::http::StatusCode> {
    match a001_customer::service::get_by_id(id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/customer
pub async fn upsert(
    Json(dto): Json<contracts::domain::a001_customer::aggregate::CustomerDto>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    let result = match dto.id {
        Some(id) => a001_customer::service::update(dto).await.map(|_| id),
        None => a001_customer::service::create(dto).await,
    };

    match result {
        Ok(id) => Ok(Json(json!({"id": id}))),
        Err(e) => {
            tracing::error!("Failed to save customer: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// DELETE /api/customer/:id
pub async fn delete(Path(id): Path<i64>) -> Result<(), axum::http::StatusCode> {
    match a001_customer::service::delete(id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
