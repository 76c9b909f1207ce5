use anyhow::Result;
use async_trait::async_trait;
use contracts::domain::a005_b2b_sale::aggregate::B2bSale;
use contracts::usecases::u501_import_sales::request::SessionAssociations;
use contracts::usecases::u501_import_sales::response::BatchOutcome;
use contracts::usecases::u501_import_sales::row::ResolvedRow;

use crate::domain::a005_b2b_sale;

/// Внешний коллаборатор: единый batch commit подтверждённых строк.
///
/// Один запрос на весь массив; частичного retry по строкам нет.
#[async_trait]
pub trait BatchCommitter: Send + Sync {
    async fn submit(
        &self,
        rows: &[ResolvedRow],
        associations: &SessionAssociations,
    ) -> Result<BatchOutcome>;
}

/// Commit в регистр B2B продаж одной транзакцией
pub struct SaleBatchCommitter;

fn to_sale(row: &ResolvedRow, associations: &SessionAssociations) -> B2bSale {
    let description = match (&row.customer_name, row.customer) {
        (Some(name), _) => format!("Импорт: {}", name),
        (None, Some(id)) => format!("Импорт: покупатель #{}", id),
        (None, None) => "Импорт".to_string(),
    };

    B2bSale::new_for_insert(
        format!("SAL-{}", uuid::Uuid::new_v4()),
        description,
        associations.sale_type,
        row.date,
        row.customer,
        row.customer_name.clone(),
        row.product,
        row.product_name.clone(),
        row.receiver,
        row.warehouse,
        row.b2b_offer,
        row.weight,
        row.price,
        row.extra.clone(),
    )
}

#[async_trait]
impl BatchCommitter for SaleBatchCommitter {
    async fn submit(
        &self,
        rows: &[ResolvedRow],
        associations: &SessionAssociations,
    ) -> Result<BatchOutcome> {
        let mut sales: Vec<B2bSale> = rows
            .iter()
            .map(|row| to_sale(row, associations))
            .collect();
        for sale in &mut sales {
            sale.before_write();
        }

        let created_count = a005_b2b_sale::service::insert_batch(&sales).await?;
        tracing::info!("Batch commit created {} sale records", created_count);
        Ok(BatchOutcome { created_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a005_b2b_sale::aggregate::SaleType;

    #[test]
    fn resolved_row_maps_to_sale_record() {
        let row = ResolvedRow {
            customer: Some(501),
            product: Some(42),
            b2b_offer: Some(7),
            weight: Some(10.0),
            price: Some(25.5),
            date: chrono::NaiveDate::from_ymd_opt(2026, 3, 1),
            ..Default::default()
        };
        let assoc = SessionAssociations {
            sale_type: SaleType::Distribution,
            ..Default::default()
        };

        let sale = to_sale(&row, &assoc);
        assert_eq!(sale.customer, Some(501));
        assert_eq!(sale.product, Some(42));
        assert_eq!(sale.b2b_offer, Some(7));
        assert_eq!(sale.sale_type, SaleType::Distribution);
        assert!(sale.base.code.starts_with("SAL-"));
    }

    #[test]
    fn passthrough_names_survive_mapping() {
        let row = ResolvedRow {
            customer_name: Some("Acme".into()),
            product_name: Some("Wheat".into()),
            ..Default::default()
        };

        let sale = to_sale(&row, &SessionAssociations::default());
        assert_eq!(sale.customer, None);
        assert_eq!(sale.customer_name.as_deref(), Some("Acme"));
        assert_eq!(sale.product_name.as_deref(), Some("Wheat"));
    }
}
