use chrono::Utc;
use contracts::domain::a005_b2b_sale::aggregate::{B2bSale, B2bSaleId, SaleType};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, NotSet, QueryFilter, QueryOrder, Set, TransactionTrait};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a005_b2b_sale")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub sale_type: String,
    pub date: Option<chrono::NaiveDate>,
    pub customer: Option<i64>,
    pub customer_name: Option<String>,
    pub product: Option<i64>,
    pub product_name: Option<String>,
    pub receiver: Option<i64>,
    pub warehouse: Option<i64>,
    pub b2b_offer: Option<i64>,
    pub weight: Option<f64>,
    pub price: Option<f64>,
    /// Неразмеченные колонки исходной строки (JSON)
    pub extra: Option<String>,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn sale_type_from_str(s: &str) -> SaleType {
    match s {
        "distribution" => SaleType::Distribution,
        _ => SaleType::Direct,
    }
}

impl From<Model> for B2bSale {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };
        let extra: BTreeMap<String, String> = m
            .extra
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default();

        B2bSale {
            base: BaseAggregate::with_metadata(
                B2bSaleId(m.id),
                m.code,
                m.description,
                m.comment.clone(),
                metadata,
            ),
            sale_type: sale_type_from_str(&m.sale_type),
            date: m.date,
            customer: m.customer,
            customer_name: m.customer_name,
            product: m.product,
            product_name: m.product_name,
            receiver: m.receiver,
            warehouse: m.warehouse,
            b2b_offer: m.b2b_offer,
            weight: m.weight,
            price: m.price,
            extra,
        }
    }
}

fn to_active_model(aggregate: &B2bSale) -> anyhow::Result<ActiveModel> {
    let extra = if aggregate.extra.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&aggregate.extra)?)
    };

    Ok(ActiveModel {
        id: NotSet,
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        sale_type: Set(aggregate.sale_type.as_str().to_string()),
        date: Set(aggregate.date),
        customer: Set(aggregate.customer),
        customer_name: Set(aggregate.customer_name.clone()),
        product: Set(aggregate.product),
        product_name: Set(aggregate.product_name.clone()),
        receiver: Set(aggregate.receiver),
        warehouse: Set(aggregate.warehouse),
        b2b_offer: Set(aggregate.b2b_offer),
        weight: Set(aggregate.weight),
        price: Set(aggregate.price),
        extra: Set(extra),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    })
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list_all() -> anyhow::Result<Vec<B2bSale>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: i64) -> anyhow::Result<Option<B2bSale>> {
    let result = Entity::find_by_id(id).one(conn()).await?;
    Ok(result.map(Into::into))
}

/// Вставить пачку записей одной транзакцией.
///
/// Либо вставляются все строки, либо ни одной — частичный retry по
/// отдельным строкам не поддерживается.
pub async fn insert_batch(aggregates: &[B2bSale]) -> anyhow::Result<usize> {
    let txn = conn().begin().await?;

    let mut inserted = 0usize;
    for aggregate in aggregates {
        let active = to_active_model(aggregate)?;
        active.insert(&txn).await?;
        inserted += 1;
    }

    txn.commit().await?;
    Ok(inserted)
}
