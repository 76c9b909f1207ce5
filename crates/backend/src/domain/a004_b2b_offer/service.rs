use super::repository;
use contracts::domain::a004_b2b_offer::aggregate::{B2bOffer, B2bOfferDto};

pub async fn create(dto: B2bOfferDto) -> anyhow::Result<i64> {
    let code = dto
        .code
        .clone()
        .unwrap_or_else(|| format!("OFR-{}", uuid::Uuid::new_v4()));
    let mut aggregate = B2bOffer::new_for_insert(
        code,
        dto.description,
        dto.customer_id,
        dto.price_per_unit,
        dto.valid_from,
        dto.comment,
    );

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: B2bOfferDto) -> anyhow::Result<()> {
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

pub async fn get_by_id(id: i64) -> anyhow::Result<Option<B2bOffer>> {
    repository::get_by_id(id).await
}

pub async fn find_by_name(name: &str) -> anyhow::Result<Option<B2bOffer>> {
    repository::find_by_name(name).await
}

pub async fn list_all() -> anyhow::Result<Vec<B2bOffer>> {
    repository::list_all().await
}
