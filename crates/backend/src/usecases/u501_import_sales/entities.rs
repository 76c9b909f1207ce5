use anyhow::Result;
use async_trait::async_trait;
use contracts::domain::a001_customer::aggregate::CustomerDto;
use contracts::domain::a002_product::aggregate::ProductDto;
use contracts::domain::a004_b2b_offer::aggregate::B2bOfferDto;
use contracts::usecases::u501_import_sales::session::EntityKind;

use crate::domain::{a001_customer, a002_product, a004_b2b_offer};

/// Внешний коллаборатор: создание недостающей сущности по форме оператора.
///
/// Возвращает id созданной записи; кеширование в сессии — забота
/// executor'а.
#[async_trait]
pub trait EntityFactory: Send + Sync {
    async fn create(&self, kind: EntityKind, payload: serde_json::Value) -> Result<i64>;
}

/// Создание через доменные сервисы
pub struct DomainEntityFactory;

#[async_trait]
impl EntityFactory for DomainEntityFactory {
    async fn create(&self, kind: EntityKind, payload: serde_json::Value) -> Result<i64> {
        match kind {
            EntityKind::Customer => {
                let dto: CustomerDto = serde_json::from_value(payload)?;
                a001_customer::service::create(dto).await
            }
            EntityKind::Product => {
                let dto: ProductDto = serde_json::from_value(payload)?;
                a002_product::service::create(dto).await
            }
            EntityKind::Offer => {
                let dto: B2bOfferDto = serde_json::from_value(payload)?;
                a004_b2b_offer::service::create(dto).await
            }
        }
    }
}
