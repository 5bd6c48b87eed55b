use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Alias, Expr, OnConflict, SimpleExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "time_tracking")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Uuid,
    pub website_url: String,
    pub website_title: Option<String>,
    pub visit_date: NaiveDate,
    pub total_time_seconds: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A fully-resolved observation ready to persist.
pub struct NewObservationEntity {
    pub user_id: Uuid,
    pub website_url: String,
    pub website_title: Option<String>,
    pub visit_date: NaiveDate,
    pub seconds: i64,
}

/// Per-site sum row produced by the aggregation query.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct SiteTotalRow {
    pub website_url: String,
    pub total_time: i64,
}

/// Record an observation with a single atomic upsert.
///
/// On conflict with the (user_id, website_url, visit_date) unique key the
/// stored seconds are incremented in place; the title is overwritten only
/// when the caller supplied one. The increment happens inside the one
/// statement, so concurrent writers for the same key cannot lose updates.
pub async fn upsert_observation(
    db: &DatabaseConnection,
    obs: NewObservationEntity,
) -> Result<(), DbErr> {
    let title_supplied = obs.website_title.is_some();

    let mut on_conflict = OnConflict::columns([
        Column::UserId,
        Column::WebsiteUrl,
        Column::VisitDate,
    ]);
    on_conflict.value(
        Column::TotalTimeSeconds,
        Expr::col((Entity, Column::TotalTimeSeconds)).add(obs.seconds),
    );
    if title_supplied {
        on_conflict.update_column(Column::WebsiteTitle);
    }

    let active_model = ActiveModel {
        id: NotSet,
        user_id: Set(obs.user_id),
        website_url: Set(obs.website_url),
        website_title: Set(obs.website_title),
        visit_date: Set(obs.visit_date),
        total_time_seconds: Set(obs.seconds),
    };

    Entity::insert(active_model)
        .on_conflict(on_conflict)
        .exec_without_returning(db)
        .await?;

    Ok(())
}

/// Per-site sums for one user across an inclusive date range, ordered by
/// descending total.
pub async fn aggregate_totals(
    db: &DatabaseConnection,
    user_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<SiteTotalRow>, DbErr> {
    // Postgres types SUM(bigint) as NUMERIC, which does not decode into
    // i64; cast the aggregate back so both backends produce a bigint.
    let summed = sum_as_bigint();
    Entity::find()
        .select_only()
        .column(Column::WebsiteUrl)
        .column_as(summed.clone(), "total_time")
        .filter(Column::UserId.eq(user_id))
        .filter(Column::VisitDate.between(from, to))
        .group_by(Column::WebsiteUrl)
        .order_by_desc(summed)
        .into_model::<SiteTotalRow>()
        .all(db)
        .await
}

fn sum_as_bigint() -> SimpleExpr {
    Expr::col((Entity, Column::TotalTimeSeconds))
        .sum()
        .cast_as(Alias::new("BIGINT"))
}

/// Fetch the stored record for one (user, site, day) key.
pub async fn find_record(
    db: &DatabaseConnection,
    user_id: Uuid,
    website_url: &str,
    visit_date: NaiveDate,
) -> Result<Option<Model>, DbErr> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::WebsiteUrl.eq(website_url))
        .filter(Column::VisitDate.eq(visit_date))
        .one(db)
        .await
}
