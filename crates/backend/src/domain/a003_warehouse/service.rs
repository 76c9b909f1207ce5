use super::repository;
use contracts::domain::a003_warehouse::aggregate::{Warehouse, WarehouseDto};

pub async fn create(dto: WarehouseDto) -> anyhow::Result<i64> {
    let code = dto
        .code
        .clone()
        .unwrap_or_else(|| format!("WHS-{}", uuid::Uuid::new_v4()));
    let mut aggregate =
        Warehouse::new_for_insert(code, dto.description, dto.address.unwrap_or_default());
    aggregate.base.comment = dto.comment;

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: WarehouseDto) -> anyhow::Result<()> {
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

pub async fn get_by_id(id: i64) -> anyhow::Result<Option<Warehouse>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Warehouse>> {
    repository::list_all().await
}
