use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // A001 Customer handlers
        .route(
            "/api/customer",
            get(handlers::a001_customer::list_all).post(handlers::a001_customer::upsert),
        )
        .route(
            "/api/customer/:id",
            get(handlers::a001_customer::get_by_id).delete(handlers::a001_customer::delete),
        )
        // A002 Product handlers
        .route(
            "/api/product",
            get(handlers::a002_product::list_all).post(handlers::a002_product::upsert),
        )
        .route(
            "/api/product/:id",
            get(handlers::a002_product::get_by_id).delete(handlers::a002_product::delete),
        )
        // A003 Warehouse handlers
        .route(
            "/api/warehouse",
            get(handlers::a003_warehouse::list_all).post(handlers::a003_warehouse::upsert),
        )
        .route(
            "/api/warehouse/:id",
            get(handlers::a003_warehouse::get_by_id).delete(handlers::a003_warehouse::delete),
        )
        // A004 B2B Offer handlers
        .route(
            "/api/b2b_offer",
            get(handlers::a004_b2b_offer::list_all).post(handlers::a004_b2b_offer::upsert),
        )
        .route(
            "/api/b2b_offer/:id",
            get(handlers::a004_b2b_offer::get_by_id).delete(handlers::a004_b2b_offer::delete),
        )
        // A005 B2B Sale handlers (регистр пополняется импортом)
        .route("/api/b2b_sale", get(handlers::a005_b2b_sale::list_all))
        .route(
            "/api/b2b_sale/:id",
            get(handlers::a005_b2b_sale::get_by_id),
        )
        // UseCase u501: Import B2B sales
        .route(
            "/api/u501/import/upload",
            post(handlers::usecases::u501_upload),
        )
        .route(
            "/api/u501/import/:session_id",
            get(handlers::usecases::u501_get_session)
                .delete(handlers::usecases::u501_cancel_session),
        )
        .route(
            "/api/u501/import/:session_id/confirm",
            post(handlers::usecases::u501_confirm_row),
        )
        .route(
            "/api/u501/import/:session_id/skip",
            post(handlers::usecases::u501_skip_row),
        )
        .route(
            "/api/u501/import/:session_id/accept-all",
            post(handlers::usecases::u501_accept_all),
        )
        .route(
            "/api/u501/import/:session_id/create-entity",
            post(handlers::usecases::u501_create_entity),
        )
        .route(
            "/api/u501/import/:session_id/commit",
            post(handlers::usecases::u501_retry_commit),
        )
}
