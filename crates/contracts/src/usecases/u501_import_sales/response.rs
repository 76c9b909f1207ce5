use serde::{Deserialize, Serialize};

use super::preview::PreviewResult;
use super::session::SessionState;

/// Ответ на загрузку файла
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// ID сессии импорта
    #[serde(rename = "sessionId")]
    pub session_id: String,

    /// Статус запуска
    pub status: ImportStartStatus,

    /// Сообщение
    pub message: String,

    /// Количество распознанных строк
    #[serde(rename = "rowCount")]
    pub row_count: usize,
}

/// Статус запуска импорта
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImportStartStatus {
    /// Успешно запущен
    Started,
    /// Ошибка при запуске
    Failed,
}

/// Результат batch commit'а
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Сколько записей создано
    #[serde(rename = "createdCount")]
    pub created_count: usize,
}

/// Снимок сессии для клиента
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    #[serde(rename = "sessionId")]
    pub session_id: String,

    pub state: SessionState,

    /// Индекс текущей строки
    pub cursor: usize,

    /// Всего строк в файле
    #[serde(rename = "totalRows")]
    pub total_rows: usize,

    #[serde(rename = "confirmedCount")]
    pub confirmed_count: usize,

    #[serde(rename = "skippedCount")]
    pub skipped_count: usize,

    /// Превью текущей строки (есть только в состоянии Preview)
    #[serde(rename = "currentPreview")]
    pub current_preview: Option<PreviewResult>,

    /// Последняя ошибка (превью или commit)
    #[serde(rename = "lastError")]
    pub last_error: Option<String>,

    /// Итог batch commit'а (есть только в состоянии Complete)
    pub outcome: Option<BatchOutcome>,
}

/// Ответ на создание сущности по ходу импорта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntityResponse {
    pub id: i64,
    /// Имя, под которым сущность закеширована в сессии
    #[serde(rename = "cachedName")]
    pub cached_name: Option<String>,
}
