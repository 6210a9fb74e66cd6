//! Create stations table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stations::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Stations::OperatorId).string().not_null())
                    .col(ColumnDef::new(Stations::Longitude).double().not_null())
                    .col(ColumnDef::new(Stations::Latitude).double().not_null())
                    .col(ColumnDef::new(Stations::Address).string().not_null())
                    .col(ColumnDef::new(Stations::Ports).text().not_null())
                    .col(
                        ColumnDef::new(Stations::OperatingHours)
                            .string()
                            .not_null()
                            .default("24/7"),
                    )
                    .col(
                        ColumnDef::new(Stations::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Stations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Stations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stations_operator")
                            .from(Stations::Table, Stations::OperatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stations_operator")
                    .table(Stations::Table)
                    .col(Stations::OperatorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stations_location")
                    .table(Stations::Table)
                    .col(Stations::Longitude)
                    .col(Stations::Latitude)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Stations {
    Table,
    Id,
    Name,
    OperatorId,
    Longitude,
    Latitude,
    Address,
    Ports,
    OperatingHours,
    Status,
    CreatedAt,
    UpdatedAt,
}
