use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UpdateTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UpdateTokens::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UpdateTokens::Token).string().not_null())
                    .col(ColumnDef::new(UpdateTokens::Status).string().not_null())
                    .col(ColumnDef::new(UpdateTokens::UsedBy).uuid().null())
                    .col(ColumnDef::new(UpdateTokens::UsedAt).timestamp().null())
                    .col(
                        ColumnDef::new(UpdateTokens::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_update_tokens_token")
                    .table(UpdateTokens::Table)
                    .col(UpdateTokens::Token)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UpdateTokens::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UpdateTokens {
    Table,
    Id,
    Token,
    Status,
    UsedBy,
    UsedAt,
    CreatedAt,
}
