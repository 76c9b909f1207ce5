use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// ID Type
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct B2bSaleId(pub i64);

impl B2bSaleId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl AggregateId for B2bSaleId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>()
            .map(B2bSaleId::new)
            .map_err(|e| format!("Invalid id: {}", e))
    }
}

// ============================================================================
// Классификация продажи
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SaleType {
    /// Прямая продажа
    #[default]
    Direct,
    /// Дистрибуция
    Distribution,
}

impl SaleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleType::Direct => "direct",
            SaleType::Distribution => "distribution",
        }
    }
}

// ============================================================================
// Aggregate Root (документ)
// ============================================================================
/// Запись B2B продажи, создаваемая batch commit'ом импорта.
///
/// Ссылочные поля хранятся как целочисленные id; для строк, принятых через
/// accept-all без резолва, id отсутствуют и сохраняются исходные имена.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct B2bSale {
    #[serde(flatten)]
    pub base: BaseAggregate<B2bSaleId>,

    #[serde(rename = "saleType", default)]
    pub sale_type: SaleType,

    pub date: Option<chrono::NaiveDate>,

    pub customer: Option<i64>,
    #[serde(rename = "customerName")]
    pub customer_name: Option<String>,

    pub product: Option<i64>,
    #[serde(rename = "productName")]
    pub product_name: Option<String>,

    pub receiver: Option<i64>,
    pub warehouse: Option<i64>,
    pub b2b_offer: Option<i64>,

    pub weight: Option<f64>,
    pub price: Option<f64>,

    /// Неразмеченные колонки исходной строки
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl B2bSale {
    #[allow(clippy::too_many_arguments)]
    pub fn new_for_insert(
        code: String,
        description: String,
        sale_type: SaleType,
        date: Option<chrono::NaiveDate>,
        customer: Option<i64>,
        customer_name: Option<String>,
        product: Option<i64>,
        product_name: Option<String>,
        receiver: Option<i64>,
        warehouse: Option<i64>,
        b2b_offer: Option<i64>,
        weight: Option<f64>,
        price: Option<f64>,
        extra: BTreeMap<String, String>,
    ) -> Self {
        let base = BaseAggregate::new(B2bSaleId::new(0), code, description);

        Self {
            base,
            sale_type,
            date,
            customer,
            customer_name,
            product,
            product_name,
            receiver,
            warehouse,
            b2b_offer,
            weight,
            price,
            extra,
        }
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for B2bSale {
    type Id = B2bSaleId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a005"
    }

    fn collection_name() -> &'static str {
        "b2b_sale"
    }

    fn element_name() -> &'static str {
        "Продажа B2B"
    }

    fn list_name() -> &'static str {
        "Продажи B2B"
    }
}
