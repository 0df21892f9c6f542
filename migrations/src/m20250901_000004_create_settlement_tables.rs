use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Bills: one row per purchase-order receiving event.
        manager
            .create_table(
                Table::create()
                    .table(Bills::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bills::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Bills::PurchaseOrderId).uuid().not_null())
                    .col(ColumnDef::new(Bills::ContactId).uuid().not_null())
                    .col(ColumnDef::new(Bills::WarehouseId).uuid().not_null())
                    .col(ColumnDef::new(Bills::Sku).string().not_null())
                    .col(
                        ColumnDef::new(Bills::BillPrice)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bills::Payment)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bills::BankId).uuid().null())
                    .col(
                        ColumnDef::new(Bills::StockRoll)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bills::StockKg)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bills::StockRib)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bills::PaidStatus).string().not_null())
                    .col(ColumnDef::new(Bills::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Bills::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bills_purchase_order_id")
                    .table(Bills::Table)
                    .col(Bills::PurchaseOrderId)
                    .to_owned(),
            )
            .await?;

        // Invoices: exactly one per sales order.
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Invoices::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Invoices::SalesOrderId).uuid().not_null())
                    .col(
                        ColumnDef::new(Invoices::InvoiceNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invoices::WarehouseId).uuid().not_null())
                    .col(ColumnDef::new(Invoices::ContactId).uuid().not_null())
                    .col(ColumnDef::new(Invoices::BankId).uuid().null())
                    .col(ColumnDef::new(Invoices::Sku).string().not_null())
                    .col(
                        ColumnDef::new(Invoices::SellPrice)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::BillPrice)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invoices::PaidPrice)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Invoices::IsBroker).boolean().not_null())
                    .col(ColumnDef::new(Invoices::Broker).uuid().null())
                    .col(
                        ColumnDef::new(Invoices::BrokerFee)
                            .decimal_len(14, 2)
                            .null(),
                    )
                    .col(ColumnDef::new(Invoices::PaidStatus).string().not_null())
                    .col(ColumnDef::new(Invoices::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Invoices::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_invoices_sales_order_id")
                    .table(Invoices::Table)
                    .col(Invoices::SalesOrderId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Commissions: broker fee owed on a brokered sale.
        manager
            .create_table(
                Table::create()
                    .table(Commissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Commissions::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Commissions::CommissionNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Commissions::InvoiceNumber)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Commissions::Broker).uuid().not_null())
                    .col(
                        ColumnDef::new(Commissions::BrokerFee)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Commissions::Payment)
                            .decimal_len(14, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Commissions::BankId).uuid().null())
                    .col(ColumnDef::new(Commissions::BankName).string().null())
                    .col(ColumnDef::new(Commissions::AccountName).string().null())
                    .col(ColumnDef::new(Commissions::AccountNumber).string().null())
                    .col(ColumnDef::new(Commissions::PaidStatus).string().not_null())
                    .col(
                        ColumnDef::new(Commissions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Commissions::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Commissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bills::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Bills {
    Table,
    Id,
    PurchaseOrderId,
    ContactId,
    WarehouseId,
    Sku,
    BillPrice,
    Payment,
    BankId,
    StockRoll,
    StockKg,
    StockRib,
    PaidStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Invoices {
    Table,
    Id,
    SalesOrderId,
    InvoiceNumber,
    WarehouseId,
    ContactId,
    BankId,
    Sku,
    SellPrice,
    BillPrice,
    PaidPrice,
    IsBroker,
    Broker,
    BrokerFee,
    PaidStatus,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Commissions {
    Table,
    Id,
    CommissionNumber,
    InvoiceNumber,
    Broker,
    BrokerFee,
    Payment,
    BankId,
    BankName,
    AccountName,
    AccountNumber,
    PaidStatus,
    CreatedAt,
    UpdatedAt,
}
