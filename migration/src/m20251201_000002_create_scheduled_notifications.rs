use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Reserved for reminder delivery; no service reads or writes this table yet.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut id = ColumnDef::new(ScheduledNotifications::Id);
        id.uuid().not_null().primary_key();
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            id.default(Expr::cust("gen_random_uuid()"));
        }

        manager
            .create_table(
                Table::create()
                    .table(ScheduledNotifications::Table)
                    .if_not_exists()
                    .col(id)
                    .col(ColumnDef::new(ScheduledNotifications::UserId).uuid().not_null())
                    .col(ColumnDef::new(ScheduledNotifications::BatchId).uuid())
                    .col(
                        ColumnDef::new(ScheduledNotifications::ScheduledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduledNotifications::Title).text().not_null())
                    .col(ColumnDef::new(ScheduledNotifications::Body).text().not_null())
                    .col(
                        ColumnDef::new(ScheduledNotifications::Status)
                            .text()
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(
                        ColumnDef::new(ScheduledNotifications::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ScheduledNotifications::LastError).text())
                    .col(ColumnDef::new(ScheduledNotifications::SentAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ScheduledNotifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scheduled_notifications_batch_id")
                            .from(ScheduledNotifications::Table, ScheduledNotifications::BatchId)
                            .to(Batches::Table, Batches::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scheduled_notifications_status_scheduled_at")
                    .table(ScheduledNotifications::Table)
                    .col(ScheduledNotifications::Status)
                    .col(ScheduledNotifications::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ScheduledNotifications::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum ScheduledNotifications {
    Table,
    Id,
    UserId,
    BatchId,
    ScheduledAt,
    Title,
    Body,
    Status,
    Attempts,
    LastError,
    SentAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Batches {
    Table,
    Id,
}
