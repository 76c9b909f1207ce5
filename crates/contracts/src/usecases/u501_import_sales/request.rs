use serde::{Deserialize, Serialize};

use super::row::ResolvedRow;
use super::session::EntityKind;
use crate::domain::a005_b2b_sale::aggregate::SaleType;

/// Ассоциации уровня сессии, выбранные оператором перед загрузкой.
///
/// Применяются ко всем строкам; при accept-all — единственный источник
/// ссылочных id для оставшихся строк.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionAssociations {
    /// Классификация продажи
    #[serde(rename = "saleType", default)]
    pub sale_type: SaleType,

    /// Выбранное коммерческое предложение
    #[serde(rename = "b2bOffer")]
    pub b2b_offer: Option<i64>,

    /// Получатель (для дистрибуции)
    pub receiver: Option<i64>,

    /// Склад отгрузки
    pub warehouse: Option<i64>,
}

/// Подтверждение текущей строки
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfirmRequest {
    /// Переопределение резолвнутой строки (опционально — оператор мог
    /// поправить значения в форме превью)
    pub resolved: Option<ResolvedRow>,
}

/// Создание недостающей сущности по ходу резолва строки
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntityRequest {
    pub kind: EntityKind,
    /// Форма сущности: CustomerDto / ProductDto / B2bOfferDto
    pub payload: serde_json::Value,
}
