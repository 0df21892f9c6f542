use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Document numbers come from a per-type counter row bumped inside the
        // same transaction as the insert it numbers, never from COUNT(*).
        manager
            .create_table(
                Table::create()
                    .table(DocumentSequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DocumentSequences::DocType)
                            .string()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DocumentSequences::LastValue)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DocumentSequences::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DocumentSequences::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DocumentSequences {
    Table,
    DocType,
    LastValue,
    UpdatedAt,
}
