use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

// ============================================================================
// ID Type
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub i64);

impl ProductId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl AggregateId for ProductId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        s.parse::<i64>()
            .map(ProductId::new)
            .map_err(|e| format!("Invalid id: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================
/// Товар (номенклатура)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub base: BaseAggregate<ProductId>,

    /// Артикул
    #[serde(default)]
    pub article: String,

    /// Единица измерения (кг по умолчанию)
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    "kg".to_string()
}

impl Product {
    pub fn new_for_insert(
        code: String,
        description: String,
        article: String,
        unit: String,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(ProductId::new(0), code, description);
        base.comment = comment;

        Self {
            base,
            article,
            unit,
        }
    }

    pub fn update(&mut self, dto: &ProductDto) {
        if let Some(code) = &dto.code {
            self.base.code = code.clone();
        }
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.article = dto.article.clone().unwrap_or_default();
        if let Some(unit) = &dto.unit {
            self.unit = unit.clone();
        }
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

impl AggregateRoot for Product {
    type Id = ProductId;

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
        "a002"
    }

    fn collection_name() -> &'static str {
        "product"
    }

    fn element_name() -> &'static str {
        "Товар"
    }

    fn list_name() -> &'static str {
        "Товары"
    }
}

// ============================================================================
// DTO
// ============================================================================
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductDto {
    pub id: Option<i64>,
    pub code: Option<String>,
    pub description: String,
    pub article: Option<String>,
    pub unit: Option<String>,
    pub comment: Option<String>,
}
