use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrders::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::ContactId).uuid().not_null())
                    .col(
                        ColumnDef::new(PurchaseOrders::WarehouseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::PoNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::DoNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::Sku).string().not_null())
                    .col(ColumnDef::new(PurchaseOrders::ItemName).string().not_null())
                    .col(ColumnDef::new(PurchaseOrders::Grade).string().null())
                    .col(ColumnDef::new(PurchaseOrders::Description).text().null())
                    .col(ColumnDef::new(PurchaseOrders::Thickness).string().null())
                    .col(ColumnDef::new(PurchaseOrders::Attachment).string().null())
                    .col(ColumnDef::new(PurchaseOrders::OrderDate).date().not_null())
                    .col(ColumnDef::new(PurchaseOrders::DateReceived).date().null())
                    .col(ColumnDef::new(PurchaseOrders::Status).string().not_null())
                    .col(
                        ColumnDef::new(PurchaseOrders::StockRoll)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::StockKg)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::StockRib)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::StockRollRev)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::StockKgRev)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::StockRibRev)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::Price)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One active purchase order per SKU: sales orders resolve their
        // source by SKU, so duplicates would make that lookup ambiguous.
        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_orders_sku")
                    .table(PurchaseOrders::Table)
                    .col(PurchaseOrders::Sku)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_purchase_orders_warehouse_id")
                    .table(PurchaseOrders::Table)
                    .col(PurchaseOrders::WarehouseId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PurchaseOrders {
    Table,
    Id,
    ContactId,
    WarehouseId,
    PoNumber,
    DoNumber,
    Sku,
    ItemName,
    Grade,
    Description,
    Thickness,
    Attachment,
    OrderDate,
    DateReceived,
    Status,
    StockRoll,
    StockKg,
    StockRib,
    StockRollRev,
    StockKgRev,
    StockRibRev,
    Price,
    CreatedAt,
    UpdatedAt,
}
