use super::repository;
use contracts::domain::a002_product::aggregate::{Product, ProductDto};

pub async fn create(dto: ProductDto) -> anyhow::Result<i64> {
    let code = dto
        .code
        .clone()
        .unwrap_or_else(|| format!("PRD-{}", uuid::Uuid::new_v4()));
    let mut aggregate = Product::new_for_insert(
        code,
        dto.description,
        dto.article.unwrap_or_default(),
        dto.unit.unwrap_or_else(|| "kg".to_string()),
        dto.comment,
    );

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: ProductDto) -> anyhow::Result<()> {
    let id = dto.id.ok_or_else(|| anyhow::anyhow!("Invalid ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Not found"))?;

    aggregate.update(&dto);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    repository::update(&aggregate).await
}

pub async fn delete(id: i64) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: i64) -> anyhow::Result<Option<Product>> {
    repository::get_by_id(id).await
}

pub async fn find_by_name(name: &str) -> anyhow::Result<Option<Product>> {
    repository::find_by_name(name).await
}

pub async fn list_all() -> anyhow::Result<Vec<Product>> {
    repository::list_all().await
}
