use chrono::Utc;
use contracts::domain::a001_customer::aggregate::{Customer, CustomerId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, EntityTrait, NotSet, QueryFilter, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_customer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub tax_number: String,
    pub vat_number: String,
    pub address: String,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Customer {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };

        Customer {
            base: BaseAggregate::with_metadata(
                CustomerId(m.id),
                m.code,
                m.description,
                m.comment.clone(),
                metadata,
            ),
            tax_number: m.tax_number,
            vat_number: m.vat_number,
            address: m.address,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list_all() -> anyhow::Result<Vec<Customer>> {
    let mut items: Vec<Customer> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    items.sort_by(|a, b| {
        a.base
            .description
            .to_lowercase()
            .cmp(&b.base.description.to_lowercase())
    });
    Ok(items)
}

pub async fn get_by_id(id: i64) -> anyhow::Result<Option<Customer>> {
    let result = Entity::find_by_id(id).one(conn()).await?;
    Ok(result.map(Into::into))
}

/// Поиск по имени без учёта регистра (для резолва строк импорта)
pub async fn find_by_name(name: &str) -> anyhow::Result<Option<Customer>> {
    let result = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(
            Expr::expr(Func::lower(Expr::col(Column::Description)))
                .eq(name.trim().to_lowercase()),
        )
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Customer) -> anyhow::Result<i64> {
    let active = ActiveModel {
        id: NotSet,
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        tax_number: Set(aggregate.tax_number.clone()),
        vat_number: Set(aggregate.vat_number.clone()),
        address: Set(aggregate.address.clone()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    };
    let inserted = active.insert(conn()).await?;
    Ok(inserted.id)
}

pub async fn update(aggregate: &Customer) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(aggregate.base.id.value()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        tax_number: Set(aggregate.tax_number.clone()),
        vat_number: Set(aggregate.vat_number.clone()),
        address: Set(aggregate.address.clone()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
        created_at: NotSet,
    };
    active.update(conn()).await?;
    Ok(())
}

pub async fn soft_delete(id: i64) -> anyhow::Result<bool> {
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
