use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TimeTracking::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimeTracking::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TimeTracking::UserId).uuid().not_null())
                    .col(ColumnDef::new(TimeTracking::WebsiteUrl).string().not_null())
                    .col(ColumnDef::new(TimeTracking::WebsiteTitle).string())
                    .col(ColumnDef::new(TimeTracking::VisitDate).date().not_null())
                    .col(
                        ColumnDef::new(TimeTracking::TotalTimeSeconds)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // The upsert key: at most one record per (user, site, day).
        manager
            .create_index(
                Index::create()
                    .name("idx_time_tracking_user_site_day")
                    .table(TimeTracking::Table)
                    .col(TimeTracking::UserId)
                    .col(TimeTracking::WebsiteUrl)
                    .col(TimeTracking::VisitDate)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TimeTracking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TimeTracking {
    Table,
    Id,
    UserId,
    WebsiteUrl,
    WebsiteTitle,
    VisitDate,
    TotalTimeSeconds,
}
