use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Profiles mirror platform accounts; `id` is the platform user id.
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::CityId).string())
                    .col(ColumnDef::new(Users::TempPassword).string())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Entries keep plain hierarchy ids so history survives reference edits.
        manager
            .create_table(
                Table::create()
                    .table(WorkEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkEntries::CityId).string().not_null())
                    .col(ColumnDef::new(WorkEntries::ZoneId).string().not_null())
                    .col(ColumnDef::new(WorkEntries::WardId).string().not_null())
                    .col(ColumnDef::new(WorkEntries::LocationId).string().not_null())
                    .col(ColumnDef::new(WorkEntries::WorkDate).date().not_null())
                    .col(ColumnDef::new(WorkEntries::SupervisorId).string().not_null())
                    .col(ColumnDef::new(WorkEntries::EngineerId).string())
                    .col(ColumnDef::new(WorkEntries::Shmr).double().not_null())
                    .col(ColumnDef::new(WorkEntries::Chmr).double().not_null())
                    .col(ColumnDef::new(WorkEntries::Hours).double().not_null())
                    .col(ColumnDef::new(WorkEntries::Landmark).string())
                    .col(ColumnDef::new(WorkEntries::Remarks).text())
                    .col(ColumnDef::new(WorkEntries::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(WorkEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_work_entries_city_date")
                    .table(WorkEntries::Table)
                    .col(WorkEntries::CityId)
                    .col(WorkEntries::WorkDate)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkEntryMedia::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkEntryMedia::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkEntryMedia::WorkEntryId).string().not_null())
                    .col(ColumnDef::new(WorkEntryMedia::MediaType).string().not_null())
                    .col(ColumnDef::new(WorkEntryMedia::Url).text().not_null())
                    .col(
                        ColumnDef::new(WorkEntryMedia::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_work_entry")
                            .from(WorkEntryMedia::Table, WorkEntryMedia::WorkEntryId)
                            .to(WorkEntries::Table, WorkEntries::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkEntryMedia::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    FullName,
    Role,
    CityId,
    TempPassword,
    CreatedAt,
}

#[derive(DeriveIden)]
enum WorkEntries {
    Table,
    Id,
    CityId,
    ZoneId,
    WardId,
    LocationId,
    WorkDate,
    SupervisorId,
    EngineerId,
    Shmr,
    Chmr,
    Hours,
    Landmark,
    Remarks,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum WorkEntryMedia {
    Table,
    Id,
    WorkEntryId,
    MediaType,
    Url,
    DisplayOrder,
}
