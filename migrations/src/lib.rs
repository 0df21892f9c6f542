pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_warehouses_table;
mod m20250901_000002_create_purchase_orders_table;
mod m20250901_000003_create_sales_orders_table;
mod m20250901_000004_create_settlement_tables;
mod m20250901_000005_create_update_tokens_table;
mod m20250901_000006_create_document_sequences_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_warehouses_table::Migration),
            Box::new(m20250901_000002_create_purchase_orders_table::Migration),
            Box::new(m20250901_000003_create_sales_orders_table::Migration),
            Box::new(m20250901_000004_create_settlement_tables::Migration),
            Box::new(m20250901_000005_create_update_tokens_table::Migration),
            Box::new(m20250901_000006_create_document_sequences_table::Migration),
        ]
    }
}
