use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A purchase order doubles as the stock ledger for its SKU: the plain
/// `stock_*` columns hold the ordered quantity still outstanding with the
/// supplier, the `*_rev` columns hold what has been received and is
/// available for sale. Receiving moves quantity from the former to the
/// latter; sales fulfillment debits the latter. Both families stay >= 0.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub contact_id: Uuid,
    pub warehouse_id: Uuid,
    pub po_number: String,
    pub do_number: String,
    #[sea_orm(unique)]
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
    #[sea_orm(has_many = "super::bill::Entity")]
    Bills,
}

impl Related<super::warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl Related<super::bill::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bills.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
