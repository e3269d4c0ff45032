use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Faxes::Table)
                    .col(ColumnDef::new(Faxes::Uuid).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Faxes::CreatedBy).big_integer())
                    .col(ColumnDef::new(Faxes::Direction).string_len(16).not_null())
                    .col(ColumnDef::new(Faxes::FromNumber).string_len(16).not_null())
                    .col(ColumnDef::new(Faxes::ToNumber).string_len(16).not_null())
                    .col(ColumnDef::new(Faxes::Sid).string_len(34))
                    .col(ColumnDef::new(Faxes::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Faxes::FaxStatus).string_len(16).not_null())
                    .col(ColumnDef::new(Faxes::ErrorMessage).string_len(256))
                    .col(ColumnDef::new(Faxes::ContentKey).string_len(64))
                    .col(ColumnDef::new(Faxes::TwilioMetadata).json().not_null())
                    .col(ColumnDef::new(Faxes::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Faxes::Table, Faxes::CreatedBy)
                            .to(crate::Users::Table, crate::Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Faxes::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
pub(crate) enum Faxes {
    Table,
    Uuid,
    CreatedBy,
    Direction,
    FromNumber,
    ToNumber,
    Sid,
    Status,
    FaxStatus,
    ErrorMessage,
    ContentKey,
    TwilioMetadata,
    CreatedAt,
}
