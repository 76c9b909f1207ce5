use axum::{extract::Path, Json};

use crate::domain::a005_b2b_sale;

/// GET /api/b2b_sale
pub async fn list_all(
) -> Result<Json<Vec<contracts::domain::a005_b2b_sale::aggregate::B2bSale>>, axum::http::StatusCode>
{
    match a005_b2b_sale::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// GET /api/b2b_sale/:id
pub async fn get_by_id(
    Path(id): Path<i64>,
) -> Result<Json<contracts::domain::a005_b2b_sale::aggregate::B2bSale>, axum::http::StatusCode> {
    match a005_b2b_sale::service::get_by_id(id).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
