use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub i64);

impl CustomerId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl AggregateId for CustomerId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>()
            .map(CustomerId::new)
            .map_err(|e| format!("Invalid id: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================
/// Покупатель (контрагент-клиент B2B торговли)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(flatten)]
    pub base: BaseAggregate<CustomerId>,

    /// Налоговый номер (БУЛСТАТ/ИНН)
    #[serde(rename = "taxNumber", default)]
    pub tax_number: String,

    /// Номер плательщика НДС
    #[serde(rename = "vatNumber", default)]
    pub vat_number: String,

    #[serde(default)]
    pub address: String,
}

impl Customer {
    pub fn new_for_insert(
        code: String,
        description: String,
        tax_number: String,
        vat_number: String,
        address: String,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(CustomerId::new(0), code, description);
        base.comment = comment;

        Self {
            base,
            tax_number,
            vat_number,
            address,
        }
    }

    pub fn update(&mut self, dto: &CustomerDto) {
        if let Some(code) = &dto.code {
            self.base.code = code.clone();
        }
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.tax_number = dto.tax_number.clone().unwrap_or_default();
        self.vat_number = dto.vat_number.clone().unwrap_or_default();
        self.address = dto.address.clone().unwrap_or_default();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Описание не может быть пустым".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Customer {
    type Id = CustomerId;

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
        "a001"
    }

    fn collection_name() -> &'static str {
        "customer"
    }

    fn element_name() -> &'static str {
        "Покупатель"
    }

    fn list_name() -> &'static str {
        "Покупатели"
    }
}

// ============================================================================
// DTO
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CustomerDto {
    pub id: Option<i64>,
    pub code: Option<String>,
    pub description: String,
    #[serde(rename = "taxNumber")]
    pub tax_number: Option<String>,
    #[serde(rename = "vatNumber")]
    pub vat_number: Option<String>,
    pub address: Option<String>,
    pub comment: Option<String>,
}
