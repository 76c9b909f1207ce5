use contracts::usecases::u501_import_sales::session::SessionState;
use thiserror::Error;

/// Ошибки конвейера импорта.
///
/// Незакрытая ссылка (needs-creation) ошибкой не является — это
/// блокирующее состояние превью, подтверждение просто отклоняется
/// через `RowNotReady`.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Фатально для сессии: файл не разобран, ни одна строка не обработана
    #[error("upload failed: {0}")]
    Upload(String),

    /// Ошибка превью одной строки (восстановимо на уровне строки)
    #[error("preview failed for row {row}: {message}")]
    Preview { row: usize, message: String },

    /// Batch commit не прошёл; подтверждённые строки остаются в памяти
    #[error("batch commit failed: {0}")]
    BatchCommit(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Строка не готова к подтверждению (есть незакрытые ссылки или нет превью)
    #[error("row {0} is not ready to confirm")]
    RowNotReady(usize),

    #[error("operation not allowed in state {0:?}")]
    InvalidState(SessionState),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
