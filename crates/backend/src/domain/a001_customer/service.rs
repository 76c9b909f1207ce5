use super::repository;
use contracts::domain::a001_customer::aggregate::{Customer, CustomerDto};

pub async fn create(dto: CustomerDto) -> anyhow::Result<i64> {
    let code = dto
        .code
        .clone()
        .unwrap_or_else(|| format!("CLT-{}", uuid::Uuid::new_v4()));
    let mut aggregate = Customer::new_for_insert(
        code,
        dto.description,
        dto.tax_number.unwrap_or_default(),
        dto.vat_number.unwrap_or_default(),
        dto.address.unwrap_or_default(),
        dto.comment,
    );

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: CustomerDto) -> anyhow::Result<()> {
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

pub async fn get_by_id(id: i64) -> anyhow::Result<Option<Customer>> {
    repository::get_by_id(id).await
}

pub async fn find_by_name(name: &str) -> anyhow::Result<Option<Customer>> {
    repository::find_by_name(name).await
}

pub async fn list_all() -> anyhow::Result<Vec<Customer>> {
    repository::list_all().await
}
