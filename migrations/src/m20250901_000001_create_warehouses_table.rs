use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Warehouses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Warehouses::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Warehouses::StoreId).uuid().not_null())
                    .col(ColumnDef::new(Warehouses::Name).string().not_null())
                    .col(ColumnDef::new(Warehouses::Address).string().null())
                    .col(
                        ColumnDef::new(Warehouses::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Warehouses::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_warehouses_store_id")
                    .table(Warehouses::Table)
                    .col(Warehouses::StoreId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Warehouses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Warehouses {
    Table,
    Id,
    StoreId,
    Name,
    Address,
    CreatedAt,
    UpdatedAt,
}
