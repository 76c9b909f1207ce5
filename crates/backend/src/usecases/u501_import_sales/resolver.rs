use anyhow::Result;
use async_trait::async_trait;
use contracts::usecases::u501_import_sales::preview::PreviewResult;
use contracts::usecases::u501_import_sales::request::SessionAssociations;
use contracts::usecases::u501_import_sales::row::{RawRow, ResolvedRow};
use contracts::usecases::u501_import_sales::session::EntityKind;

use super::entity_cache::EntityCache;
use crate::domain::{a001_customer, a002_product, a004_b2b_offer};

/// Вход превью: строка плюс id, уже подставленные из кеша сессии.
///
/// Ссылка, закрытая подстановкой, считается резолвнутой по id — сервис
/// превью не имеет права снова пометить её как "требует создания".
#[derive(Debug, Clone)]
pub struct PreviewRequest {
    pub row: RawRow,
    pub cached_customer: Option<i64>,
    pub cached_product: Option<i64>,
    pub cached_offer: Option<i64>,
    pub associations: SessionAssociations,
}

/// Внешний коллаборатор: dry-run резолв одной строки
#[async_trait]
pub trait PreviewService: Send + Sync {
    async fn preview(&self, request: &PreviewRequest) -> Result<PreviewResult>;
}

/// Резолвер строки: подстановка из кеша перед вызовом превью
pub struct RowResolver;

impl RowResolver {
    /// Собрать запрос превью, подставив id из кеша по именам строки
    pub fn build_request(
        row: &RawRow,
        cache: &EntityCache,
        associations: &SessionAssociations,
    ) -> PreviewRequest {
        let cached_customer = row
            .customer_name
            .as_deref()
            .and_then(|name| cache.get(EntityKind::Customer, name));
        let cached_product = row
            .product_name
            .as_deref()
            .and_then(|name| cache.get(EntityKind::Product, name));
        let cached_offer = row
            .offer_name
            .as_deref()
            .and_then(|name| cache.get(EntityKind::Offer, name));

        PreviewRequest {
            row: row.clone(),
            cached_customer,
            cached_product,
            cached_offer,
            associations: associations.clone(),
        }
    }

    pub async fn preview_row(
        service: &dyn PreviewService,
        row: &RawRow,
        cache: &EntityCache,
        associations: &SessionAssociations,
    ) -> Result<PreviewResult> {
        let request = Self::build_request(row, cache, associations);
        service.preview(&request).await
    }
}

/// Превью на основе доменных репозиториев: ссылки ищутся по имени
/// (без учёта регистра) среди существующих записей.
pub struct DomainPreviewService;

#[async_trait]
impl PreviewService for DomainPreviewService {
    async fn preview(&self, request: &PreviewRequest) -> Result<PreviewResult> {
        let row = &request.row;
        let assoc = &request.associations;
        let mut result = PreviewResult {
            unmapped_fields: row.unmapped.clone(),
            ..Default::default()
        };

        let mut resolved = ResolvedRow {
            weight: row.weight,
            price: row.price,
            date: row.date,
            extra: row.unmapped.clone(),
            ..Default::default()
        };

        // Покупатель: кеш → справочник → запрос на создание
        if let Some(id) = request.cached_customer {
            resolved.customer = Some(id);
        } else if let Some(name) = row.customer_name.as_deref() {
            match a001_customer::service::find_by_name(name).await? {
                Some(customer) => resolved.customer = Some(customer.base.id.value()),
                None => {
                    result.needs_customer_creation = true;
                    result.customer_display_name = Some(name.to_string());
                }
            }
        }

        // Товар: кеш → справочник → запрос на создание
        if let Some(id) = request.cached_product {
            resolved.product = Some(id);
        } else if let Some(name) = row.product_name.as_deref() {
            match a002_product::service::find_by_name(name).await? {
                Some(product) => resolved.product = Some(product.base.id.value()),
                None => {
                    result.needs_product_creation = true;
                    result.product_display_name = Some(name.to_string());
                }
            }
        }

        // Предложение: кеш → справочник → ассоциация сессии
        if let Some(id) = request.cached_offer {
            resolved.b2b_offer = Some(id);
        } else if let Some(name) = row.offer_name.as_deref() {
            resolved.b2b_offer = a004_b2b_offer::service::find_by_name(name)
                .await?
                .map(|offer| offer.base.id.value())
                .or(assoc.b2b_offer);
        } else {
            resolved.b2b_offer = assoc.b2b_offer;
        }

        // Получатель: имя ищется среди покупателей, иначе ассоциация сессии
        if let Some(name) = row.receiver_name.as_deref() {
            resolved.receiver = a001_customer::service::find_by_name(name)
                .await?
                .map(|customer| customer.base.id.value())
                .or(assoc.receiver);
        } else {
            resolved.receiver = assoc.receiver;
        }

        resolved.warehouse = assoc.warehouse;

        result.resolved_data = resolved;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_hits_are_substituted_before_preview() {
        let mut cache = EntityCache::new();
        cache.put(EntityKind::Customer, "Acme", 501);
        cache.put(EntityKind::Product, "Wheat", 42);

        let row = RawRow {
            customer_name: Some("ACME".into()),
            product_name: Some("wheat".into()),
            offer_name: Some("Spring".into()),
            ..Default::default()
        };

        let request =
            RowResolver::build_request(&row, &cache, &SessionAssociations::default());
        assert_eq!(request.cached_customer, Some(501));
        assert_eq!(request.cached_product, Some(42));
        // Spring не создавался в этой сессии — кеш молчит
        assert_eq!(request.cached_offer, None);
    }

    #[test]
    fn rows_without_names_substitute_nothing() {
        let cache = EntityCache::new();
        let row = RawRow {
            weight: Some(5.0),
            ..Default::default()
        };

        let request =
            RowResolver::build_request(&row, &cache, &SessionAssociations::default());
        assert_eq!(request.cached_customer, None);
        assert_eq!(request.cached_product, None);
        assert_eq!(request.cached_offer, None);
    }
}
