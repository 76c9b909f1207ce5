use serde::{Deserialize, Serialize};

/// Состояние сессии импорта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Файл ещё не загружен. Чисто клиентское состояние (форма выбора
    /// файла): сессия на сервере появляется только после загрузки, поэтому
    /// бэкенд это значение не выдаёт
    Selecting,
    /// Строки обрабатываются
    Processing,
    /// Текущая строка на ревью у оператора
    Preview,
    /// Batch commit выполнен, сессия завершена
    Complete,
}

/// Политика обработки ошибки превью (сетевая/серверная ошибка на строке).
///
/// Исторически строка молча пропускалась; политика оставлена настраиваемой.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PreviewErrorPolicy {
    /// Молча пропустить строку и идти дальше (поведение по умолчанию)
    #[default]
    Skip,
    /// Повторить запрос один раз, при повторной ошибке — пропустить
    Retry,
    /// Показать ошибку оператору; подтверждение заблокировано, доступен
    /// только явный пропуск
    Prompt,
}

/// Тип сущности, создаваемой по ходу резолва строки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Customer,
    Product,
    Offer,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Customer => "customer",
            EntityKind::Product => "product",
            EntityKind::Offer => "offer",
        }
    }
}
