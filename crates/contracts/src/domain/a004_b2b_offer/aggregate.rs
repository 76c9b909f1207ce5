use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct B2bOfferId(pub i64);

impl B2bOfferId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl AggregateId for B2bOfferId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>()
            .map(B2bOfferId::new)
            .map_err(|e| format!("Invalid id: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================
/// Коммерческое предложение B2B
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct B2bOffer {
    #[serde(flatten)]
    pub base: BaseAggregate<B2bOfferId>,

    /// Покупатель, для которого действует предложение (опционально)
    #[serde(rename = "customerId")]
    pub customer_id: Option<i64>,

    /// Цена за единицу по предложению
    #[serde(rename = "pricePerUnit")]
    pub price_per_unit: Option<f64>,

    /// Дата начала действия (ISO)
    #[serde(rename = "validFrom")]
    pub valid_from: Option<chrono::NaiveDate>,
}

impl B2bOffer {
    pub fn new_for_insert(
        code: String,
        description: String,
        customer_id: Option<i64>,
        price_per_unit: Option<f64>,
        valid_from: Option<chrono::NaiveDate>,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(B2bOfferId::new(0), code, description);
        base.comment = comment;

        Self {
            base,
            customer_id,
            price_per_unit,
            valid_from,
        }
    }

    pub fn update(&mut self, dto: &B2bOfferDto) {
        if let Some(code) = &dto.code {
            self.base.code = code.clone();
        }
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.customer_id = dto.customer_id;
        self.price_per_unit = dto.price_per_unit;
        self.valid_from = dto.valid_from;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Описание не может быть пустым".into());
        }
        if let Some(price) = self.price_per_unit {
            if price < 0.0 {
                return Err("Цена не может быть отрицательной".into());
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for B2bOffer {
    type Id = B2bOfferId;

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
        "a004"
    }

    fn collection_name() -> &'static str {
        "b2b_offer"
    }

    fn element_name() -> &'static str {
        "Коммерческое предложение"
    }

    fn list_name() -> &'static str {
        "Коммерческие предложения"
    }
}

// ============================================================================
// DTO
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct B2bOfferDto {
    pub id: Option<i64>,
    pub code: Option<String>,
    pub description: String,
    #[serde(rename = "customerId")]
    pub customer_id: Option<i64>,
    #[serde(rename = "pricePerUnit")]
    pub price_per_unit: Option<f64>,
    #[serde(rename = "validFrom")]
    pub valid_from: Option<chrono::NaiveDate>,
    pub comment: Option<String>,
}
