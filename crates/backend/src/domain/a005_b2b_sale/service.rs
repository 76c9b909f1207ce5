use super::repository;
use contracts::domain::a005_b2b_sale::aggregate::B2bSale;

pub async fn get_by_id(id: i64) -> anyhow::Result<Option<B2bSale>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<B2bSale>> {
    repository::list_all().await
}

pub async fn insert_batch(aggregates: &[B2bSale]) -> anyhow::Result<usize> {
    repository::insert_batch(aggregates).await
}
