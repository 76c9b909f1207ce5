use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::request::SessionAssociations;

/// Одна нормализованная строка загруженного файла.
///
/// Известные поля вынесены явно, всё остальное парсер складывает в
/// `unmapped`. Строка неизменяема после загрузки.
///
/// Имена полей — контракт парсера (`customer_name`, `product_name`, ...),
/// сериализация остаётся в snake_case.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RawRow {
    pub customer_name: Option<String>,
    pub receiver_name: Option<String>,
    pub product_name: Option<String>,
    pub offer_name: Option<String>,
    pub weight: Option<f64>,
    pub price: Option<f64>,
    pub date: Option<chrono::NaiveDate>,
    /// Колонки, не попавшие в известные поля
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unmapped: BTreeMap<String, String>,
}

/// Строка, готовая к batch commit'у.
///
/// Ссылочные поля — целочисленные id (`customer`, `product`, `receiver`,
/// `warehouse`, `b2b_offer`); имена сериализуются как есть — это wire
/// contract существующих бэкендов. Для строк, принятых через accept-all,
/// id остаются пустыми и имена передаются насквозь.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ResolvedRow {
    pub customer: Option<i64>,
    pub product: Option<i64>,
    pub receiver: Option<i64>,
    pub warehouse: Option<i64>,
    pub b2b_offer: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,

    pub weight: Option<f64>,
    pub price: Option<f64>,
    pub date: Option<chrono::NaiveDate>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl ResolvedRow {
    /// Все ссылки на покупателя и товар закрыты по id
    pub fn is_fully_addressed(&self) -> bool {
        self.customer.is_some() && self.product.is_some()
    }

    /// Построить строку из сырой без резолва — путь accept-all.
    ///
    /// Ссылочные id не заполняются (кроме выбранных на уровне сессии
    /// ассоциаций), имена передаются насквозь.
    pub fn from_raw_with_associations(raw: &RawRow, assoc: &SessionAssociations) -> Self {
        Self {
            customer: None,
            product: None,
            receiver: assoc.receiver,
            warehouse: assoc.warehouse,
            b2b_offer: assoc.b2b_offer,
            customer_name: raw.customer_name.clone(),
            product_name: raw.product_name.clone(),
            weight: raw.weight,
            price: raw.price,
            date: raw.date,
            extra: raw.unmapped.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a005_b2b_sale::aggregate::SaleType;

    #[test]
    fn accept_all_row_carries_names_and_associations() {
        let raw = RawRow {
            customer_name: Some("Acme".into()),
            product_name: Some("Wheat".into()),
            weight: Some(10.0),
            ..Default::default()
        };
        let assoc = SessionAssociations {
            sale_type: SaleType::Distribution,
            b2b_offer: Some(7),
            receiver: Some(3),
            warehouse: None,
        };

        let row = ResolvedRow::from_raw_with_associations(&raw, &assoc);
        assert_eq!(row.customer, None);
        assert_eq!(row.customer_name.as_deref(), Some("Acme"));
        assert_eq!(row.b2b_offer, Some(7));
        assert_eq!(row.receiver, Some(3));
        assert_eq!(row.weight, Some(10.0));
    }
}
