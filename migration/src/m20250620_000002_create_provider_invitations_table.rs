use super::m20250612_000001_create_users_table::Users;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProviderInvitations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProviderInvitations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProviderInvitations::Email)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderInvitations::BusinessName)
                            .string_len(200)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderInvitations::CommissionRate)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderInvitations::Token)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ProviderInvitations::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(ProviderInvitations::InvitedBy)
                            .uuid()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ProviderInvitations::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderInvitations::AcceptedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ProviderInvitations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_invitations_invited_by")
                            .from(ProviderInvitations::Table, ProviderInvitations::InvitedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .table(ProviderInvitations::Table)
                    .name("idx_provider_invitations_email")
                    .col(ProviderInvitations::Email)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProviderInvitations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProviderInvitations {
    Table,
    Id,
    Email,
    BusinessName,
    CommissionRate,
    Token,
    Status,
    InvitedBy,
    ExpiresAt,
    AcceptedAt,
    CreatedAt,
}
