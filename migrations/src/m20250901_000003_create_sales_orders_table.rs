use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SalesOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SalesOrders::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SalesOrders::ContactId).uuid().not_null())
                    .col(ColumnDef::new(SalesOrders::WarehouseId).uuid().not_null())
                    .col(ColumnDef::new(SalesOrders::SoNumber).string().not_null())
                    .col(ColumnDef::new(SalesOrders::DoNumber).string().not_null())
                    .col(ColumnDef::new(SalesOrders::Sku).string().not_null())
                    .col(ColumnDef::new(SalesOrders::ItemName).string().not_null())
                    .col(ColumnDef::new(SalesOrders::Grade).string().null())
                    .col(ColumnDef::new(SalesOrders::Description).text().null())
                    .col(ColumnDef::new(SalesOrders::Thickness).string().null())
                    .col(ColumnDef::new(SalesOrders::Attachment).string().null())
                    .col(ColumnDef::new(SalesOrders::OrderDate).date().not_null())
                    .col(ColumnDef::new(SalesOrders::DateReceived).date().null())
                    .col(ColumnDef::new(SalesOrders::Status).string().not_null())
                    .col(ColumnDef::new(SalesOrders::Broker).uuid().null())
                    .col(
                        ColumnDef::new(SalesOrders::BrokerFee)
                            .decimal_len(14, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SalesOrders::StockRoll)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesOrders::StockKg)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesOrders::StockRib)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesOrders::StockRollRev)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesOrders::StockKgRev)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesOrders::StockRibRev)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesOrders::Price)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesOrders::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalesOrders::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sales_orders_sku")
                    .table(SalesOrders::Table)
                    .col(SalesOrders::Sku)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SalesOrders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SalesOrders {
    Table,
    Id,
    ContactId,
    WarehouseId,
    SoNumber,
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
    Broker,
    BrokerFee,
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
