use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthenticationTokens::Table)
                    .col(
                        ColumnDef::new(AuthenticationTokens::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // Unique constraint keeps the user <-> token relation 1:1,
                    // concurrent first logins resolve on conflict instead of locking.
                    .col(
                        ColumnDef::new(AuthenticationTokens::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AuthenticationTokens::Key)
                            .string_len(40)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AuthenticationTokens::UserAgent).string_len(256))
                    .col(ColumnDef::new(AuthenticationTokens::IpAddressHash).string_len(128))
                    .col(
                        ColumnDef::new(AuthenticationTokens::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AuthenticationTokens::Table, AuthenticationTokens::UserId)
                            .to(crate::Users::Table, crate::Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-authentication-tokens-key")
                    .table(AuthenticationTokens::Table)
                    .col(AuthenticationTokens::Key)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuthenticationTokens::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
pub(crate) enum AuthenticationTokens {
    Table,
    Id,
    UserId,
    Key,
    UserAgent,
    IpAddressHash,
    CreatedAt,
}
