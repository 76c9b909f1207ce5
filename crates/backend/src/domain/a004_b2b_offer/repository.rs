use chrono::Utc;
use contracts::domain::a004_b2b_offer::aggregate::{B2bOffer, B2bOfferId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, EntityTrait, NotSet, QueryFilter, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_b2b_offer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub customer_id: Option<i64>,
    pub price_per_unit: Option<f64>,
    pub valid_from: Option<chrono::NaiveDate>,
    pub is_deleted: bool,
    pub is_posted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for B2bOffer {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            is_posted: m.is_posted,
            version: m.version,
        };

        B2bOffer {
            base: BaseAggregate::with_metadata(
                B2bOfferId(m.id),
                m.code,
                m.description,
                m.comment.clone(),
                metadata,
            ),
            customer_id: m.customer_id,
            price_per_unit: m.price_per_unit,
            valid_from: m.valid_from,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

pub async fn list_all() -> anyhow::Result<Vec<B2bOffer>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: i64) -> anyhow::Result<Option<B2bOffer>> {
    let result = Entity::find_by_id(id).one(conn()).await?;
    Ok(result.map(Into::into))
}

/// Поиск по имени без учёта регистра (для резолва строк импорта)
pub async fn find_by_name(name: &str) -> anyhow::Result<Option<B2bOffer>> {
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

pub async fn insert(aggregate: &B2bOffer) -> anyhow::Result<i64> {
    let active = ActiveModel {
        id: NotSet,
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        customer_id: Set(aggregate.customer_id),
        price_per_unit: Set(aggregate.price_per_unit),
        valid_from: Set(aggregate.valid_from),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        is_posted: Set(aggregate.base.metadata.is_posted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    };
    let inserted = active.insert(conn()).await?;
    Ok(inserted.id)
}

pub async fn update(aggregate: &B2bOffer) -> anyhow::Result<()> {
    let active = ActiveModel {
        id: Set(aggregate.base.id.value()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        customer_id: Set(aggregate.customer_id),
        price_per_unit: Set(aggregate.price_per_unit),
        valid_from: Set(aggregate.valid_from),
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
