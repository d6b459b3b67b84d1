use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Primary key column for application-generated UUIDs. Postgres also gets a
/// server-side default so rows inserted by hand stay valid.
fn uuid_pk<T: IntoIden>(column: T, backend: sea_orm::DatabaseBackend) -> ColumnDef {
    let mut def = ColumnDef::new(column);
    def.uuid().not_null().primary_key();
    if backend == sea_orm::DatabaseBackend::Postgres {
        def.default(Expr::cust("gen_random_uuid()"));
    }
    def
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        if !matches!(
            backend,
            sea_orm::DatabaseBackend::Postgres | sea_orm::DatabaseBackend::Sqlite
        ) {
            return Err(DbErr::Custom("Unsupported database backend".to_string()));
        }

        manager
            .create_table(
                Table::create()
                    .table(Incubators::Table)
                    .if_not_exists()
                    .col(uuid_pk(Incubators::Id, backend))
                    .col(ColumnDef::new(Incubators::UserId).uuid().not_null())
                    .col(ColumnDef::new(Incubators::Model).text())
                    .col(ColumnDef::new(Incubators::TraysAmt).integer())
                    .col(
                        ColumnDef::new(Incubators::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Incubators::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Trays::Table)
                    .if_not_exists()
                    .col(uuid_pk(Trays::Id, backend))
                    .col(ColumnDef::new(Trays::IncubatorId).uuid().not_null())
                    .col(ColumnDef::new(Trays::Capacity).integer().not_null())
                    .col(ColumnDef::new(Trays::Floor).integer().not_null())
                    .col(
                        ColumnDef::new(Trays::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trays_incubator_id")
                            .from(Trays::Table, Trays::IncubatorId)
                            .to(Incubators::Table, Incubators::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Species::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Species::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(Species::Name).text().not_null())
                    .col(ColumnDef::new(Species::IncubationDays).integer().not_null())
                    .col(ColumnDef::new(Species::TempMin).decimal_len(6, 2).not_null())
                    .col(ColumnDef::new(Species::TempMax).decimal_len(6, 2).not_null())
                    .col(ColumnDef::new(Species::HumidityMin).decimal_len(6, 2).not_null())
                    .col(ColumnDef::new(Species::HumidityMax).decimal_len(6, 2).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Batches::Table)
                    .if_not_exists()
                    .col(uuid_pk(Batches::Id, backend))
                    .col(ColumnDef::new(Batches::TrayId).uuid().not_null())
                    .col(ColumnDef::new(Batches::SpeciesId).text().not_null())
                    .col(ColumnDef::new(Batches::EggsQty).integer().not_null())
                    .col(ColumnDef::new(Batches::StartAt).date().not_null())
                    .col(ColumnDef::new(Batches::ExpectedHatchAt).date().not_null())
                    .col(
                        ColumnDef::new(Batches::Status)
                            .text()
                            .not_null()
                            .default("incubating"),
                    )
                    .col(ColumnDef::new(Batches::Notes).text())
                    .col(
                        ColumnDef::new(Batches::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_batches_tray_id")
                            .from(Batches::Table, Batches::TrayId)
                            .to(Trays::Table, Trays::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_batches_species_id")
                            .from(Batches::Table, Batches::SpeciesId)
                            .to(Species::Table, Species::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Floors are unique per incubator
        manager
            .create_index(
                Index::create()
                    .name("uq_trays_incubator_floor")
                    .table(Trays::Table)
                    .col(Trays::IncubatorId)
                    .col(Trays::Floor)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_incubators_user_position")
                    .table(Incubators::Table)
                    .col(Incubators::UserId)
                    .col(Incubators::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_batches_tray_id")
                    .table(Batches::Table)
                    .col(Batches::TrayId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse dependency order
        manager
            .drop_table(Table::drop().table(Batches::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Species::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trays::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incubators::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Incubators {
    Table,
    Id,
    UserId,
    Model,
    TraysAmt,
    Position,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Trays {
    Table,
    Id,
    IncubatorId,
    Capacity,
    Floor,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Species {
    Table,
    Id,
    Name,
    IncubationDays,
    TempMin,
    TempMax,
    HumidityMin,
    HumidityMax,
}

#[derive(DeriveIden)]
enum Batches {
    Table,
    Id,
    TrayId,
    SpeciesId,
    EggsQty,
    StartAt,
    ExpectedHatchAt,
    Status,
    Notes,
    CreatedAt,
}
