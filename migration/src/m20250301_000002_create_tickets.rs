use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tickets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tickets::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Tickets::Description).text().not_null())
                    .col(ColumnDef::new(Tickets::Category).string_len(50).not_null())
                    .col(ColumnDef::new(Tickets::Priority).string_len(20).not_null())
                    .col(ColumnDef::new(Tickets::Status).string_len(20).not_null().default("Open"))
                    .col(ColumnDef::new(Tickets::UserName).string_len(100).not_null())
                    .col(ColumnDef::new(Tickets::UserIpAddress).string_len(45).null())
                    .col(ColumnDef::new(Tickets::UserSystemName).string_len(100).null())
                    .col(ColumnDef::new(Tickets::UserId).integer().not_null())
                    .col(ColumnDef::new(Tickets::AssignedTo).integer().null())
                    .col(ColumnDef::new(Tickets::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Tickets::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Tickets::ResolvedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_user_id")
                            .from(Tickets::Table, Tickets::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_assigned_to")
                            .from(Tickets::Table, Tickets::AssignedTo)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_user_id")
                    .table(Tickets::Table)
                    .col(Tickets::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_assigned_to")
                    .table(Tickets::Table)
                    .col(Tickets::AssignedTo)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tickets_status")
                    .table(Tickets::Table)
                    .col(Tickets::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tickets::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Tickets {
    Table,
    Id,
    Title,
    Description,
    Category,
    Priority,
    Status,
    UserName,
    UserIpAddress,
    UserSystemName,
    UserId,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
    ResolvedAt,
}
