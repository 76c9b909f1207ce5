use axum::extract::{Multipart, Path};
use axum::Json;
use once_cell::sync::Lazy;
use std::sync::Arc;

use contracts::usecases::u501_import_sales::request::{
    ConfirmRequest, CreateEntityRequest, SessionAssociations,
};
use contracts::usecases::u501_import_sales::response::{
    CreateEntityResponse, ImportStartStatus, SessionView, UploadResponse,
};

use crate::shared::config;
use crate::usecases::u501_import_sales::{ImportError, ImportExecutor};

// ============================================================================
// UseCase u501: Import B2B sales from file
// ============================================================================

static IMPORT_EXECUTOR: Lazy<Arc<ImportExecutor>> = Lazy::new(|| {
    let policy = config::load_config()
        .map(|c| c.import.on_preview_error)
        .unwrap_or_default();
    Arc::new(ImportExecutor::production(policy))
});

fn status_for(err: &ImportError) -> axum::http::StatusCode {
    use axum::http::StatusCode;
    match err {
        ImportError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        ImportError::RowNotReady(_) | ImportError::InvalidState(_) => StatusCode::CONFLICT,
        ImportError::Upload(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// POST /api/u501/import/upload
///
/// Multipart: поле `file` — сам файл, опциональное поле `associations` —
/// JSON с ассоциациями уровня сессии.
pub async fn u501_upload(
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, axum::http::StatusCode> {
    let mut file_name = String::from("upload.csv");
    let mut bytes: Option<Vec<u8>> = None;
    let mut associations = SessionAssociations::default();

    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name() {
            Some("file") => {
                if let Some(name) = field.file_name() {
                    file_name = name.to_string();
                }
                match field.bytes().await {
                    Ok(data) => bytes = Some(data.to_vec()),
                    Err(e) => {
                        tracing::error!("Failed to read uploaded file: {}", e);
                        return Err(axum::http::StatusCode::BAD_REQUEST);
                    }
                }
            }
            Some("associations") => {
                let text = field.text().await.unwrap_or_default();
                match serde_json::from_str(&text) {
                    Ok(parsed) => associations = parsed,
                    Err(e) => {
                        tracing::error!("Invalid associations payload: {}", e);
                        return Err(axum::http::StatusCode::BAD_REQUEST);
                    }
                }
            }
            _ => {}
        }
    }

    let bytes = match bytes {
        Some(b) => b,
        None => return Err(axum::http::StatusCode::BAD_REQUEST),
    };

    match IMPORT_EXECUTOR
        .start_session(&file_name, &bytes, associations)
        .await
    {
        Ok(response) => Ok(Json(response)),
        Err(ImportError::Upload(message)) => {
            tracing::warn!("Import upload rejected: {}", message);
            Ok(Json(UploadResponse {
                session_id: String::new(),
                status: ImportStartStatus::Failed,
                message,
                row_count: 0,
            }))
        }
        Err(e) => {
            tracing::error!("Failed to start import: {}", e);
            Err(status_for(&e))
        }
    }
}

/// GET /api/u501/import/:session_id
pub async fn u501_get_session(
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, axum::http::StatusCode> {
    match IMPORT_EXECUTOR.get_session(&session_id) {
        Ok(view) => Ok(Json(view)),
        Err(e) => Err(status_for(&e)),
    }
}

/// POST /api/u501/import/:session_id/confirm
pub async fn u501_confirm_row(
    Path(session_id): Path<String>,
    Json(request): Json<ConfirmRequest>,
) -> Result<Json<SessionView>, axum::http::StatusCode> {
    match IMPORT_EXECUTOR
        .confirm_current_row(&session_id, request.resolved)
        .await
    {
        Ok(view) => Ok(Json(view)),
        Err(e) => {
            tracing::error!("Failed to confirm row: {}", e);
            Err(status_for(&e))
        }
    }
}

/// POST /api/u501/import/:session_id/skip
pub async fn u501_skip_row(
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, axum::http::StatusCode> {
    match IMPORT_EXECUTOR.skip_current_row(&session_id).await {
        Ok(view) => Ok(Json(view)),
        Err(e) => {
            tracing::error!("Failed to skip row: {}", e);
            Err(status_for(&e))
        }
    }
}

/// POST /api/u501/import/:session_id/accept-all
pub async fn u501_accept_all(
    Path(session_id): Path<String>,
    associations: Option<Json<SessionAssociations>>,
) -> Result<Json<SessionView>, axum::http::StatusCode> {
    match IMPORT_EXECUTOR
        .accept_all_remaining(&session_id, associations.map(|Json(a)| a))
        .await
    {
        Ok(view) => Ok(Json(view)),
        Err(e) => {
            tracing::error!("Failed to accept remaining rows: {}", e);
            Err(status_for(&e))
        }
    }
}

/// POST /api/u501/import/:session_id/create-entity
pub async fn u501_create_entity(
    Path(session_id): Path<String>,
    Json(request): Json<CreateEntityRequest>,
) -> Result<Json<CreateEntityResponse>, axum::http::StatusCode> {
    match IMPORT_EXECUTOR
        .create_missing_entity(&session_id, request)
        .await
    {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Failed to create entity during import: {}", e);
            Err(status_for(&e))
        }
    }
}

/// POST /api/u501/import/:session_id/commit
pub async fn u501_retry_commit(
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, axum::http::StatusCode> {
    match IMPORT_EXECUTOR.retry_commit(&session_id).await {
        Ok(view) => Ok(Json(view)),
        Err(e) => {
            tracing::error!("Failed to commit import batch: {}", e);
            Err(status_for(&e))
        }
    }
}

/// DELETE /api/u501/import/:session_id
pub async fn u501_cancel_session(
    Path(session_id): Path<String>,
) -> Result<(), axum::http::StatusCode> {
    match IMPORT_EXECUTOR.cancel_session(&session_id) {
        Ok(()) => Ok(()),
        Err(e) => Err(status_for(&e)),
    }
}
