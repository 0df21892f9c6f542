use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A sales order debits a purchase order's available stock at creation; its
/// `stock_*` columns are fixed from then on, while the `*_rev` columns count
/// delivery confirmations toward them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub contact_id: Uuid,
    pub warehouse_id: Uuid,
    pub so_number: String,
    pub do_number: String,
    pub sku: String,
    pub item_name: String,
    pub grade: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub thickness: Option<String>,
    pub attachment: Option<String>,
    pub order_date: NaiveDate,
    pub date_received: Option<NaiveDate>,
    pub status: String,
    pub broker: Option<Uuid>,
    pub broker_fee: Option<Decimal>,
    pub stock_roll: Decimal,
    pub stock_kg: Decimal,
    pub stock_rib: Decimal,
    pub stock_roll_rev: Decimal,
    pub stock_kg_rev: Decimal,
    pub stock_rib_rev: Decimal,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouse::Entity",
        from = "Column::WarehouseId",
        to = "super::warehouse::Column::Id"
    )]
    Warehouse,
    #[sea_orm(has_one = "super::invoice::Entity")]
    Invoice,
}

impl Related<super::warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
