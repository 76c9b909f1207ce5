use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::row::ResolvedRow;

/// Результат превью одной строки.
///
/// Живёт только пока обрабатывается текущая строка; никуда не
/// персистится.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PreviewResult {
    /// Частично резолвнутая строка (id проставлены там, где ссылка закрыта)
    #[serde(rename = "resolvedData")]
    pub resolved_data: ResolvedRow,

    /// Поля, которые не удалось сопоставить — для ревью оператором
    #[serde(rename = "unmappedFields", default)]
    pub unmapped_fields: BTreeMap<String, String>,

    /// Покупатель не найден — требуется создание
    #[serde(rename = "needsCustomerCreation", default)]
    pub needs_customer_creation: bool,

    /// Товар не найден — требуется создание
    #[serde(rename = "needsProductCreation", default)]
    pub needs_product_creation: bool,

    /// Имя покупателя, вызвавшее запрос на создание
    #[serde(rename = "customerDisplayName")]
    pub customer_display_name: Option<String>,

    /// Имя товара, вызвавшее запрос на создание
    #[serde(rename = "productDisplayName")]
    pub product_display_name: Option<String>,
}

impl PreviewResult {
    /// Строку можно подтверждать: нет незакрытых ссылок
    pub fn is_ready(&self) -> bool {
        !self.needs_customer_creation && !self.needs_product_creation
    }
}
