use axum::{extract::Path, Json};
use serde_json::json;

use crate::domain::a004_b2b_offer;

/// GET /api/b2b_offer
pub async fn list_all() -> Result<
    Json<Vec<contracts::domain::a004_b2b_offer::aggregate::B2bOffer>>,
    axum::http::StatusCode,
> {
    match a004_b2b_offer::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/b2b_offer/:id
pub async fn get_by_id(
    Path(id): Path<i64>,
) -> Result<Json<contracts::domain::a004_b2b_offer::aggregate::B2bOffer>, axum::http::StatusCode>
{
    match a004_b2b_offer::service::get_by_id(id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// POST /api/b2b_offer
pub async fn upsert(
    Json(dto): Json<contracts::domain::a004_b2b_offer::aggregate::B2bOfferDto>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    let result = match dto.id {
        Some(id) => a004_b2b_offer::service::update(dto).await.map(|_| id),
        None => a004_b2b_offer::service::create(dto).await,
    };

    match result {
        Ok(id) => Ok(Json(json!({"id": id}))),
        Err(e) => {
            tracing::error!("Failed to save b2b offer: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// DELETE /api/b2b_offer/:id
pub async fn delete(Path(id): Path<i64>) -> Result<(), axum::http::StatusCode> {
    match a004_b2b_offer::service::delete(id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
