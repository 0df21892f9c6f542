use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Amount owed by a customer for one sales order (1:1). `paid_price`
/// accumulates settlements against `bill_price`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub sales_order_id: Uuid,
    pub invoice_number: String,
    pub warehouse_id: Uuid,
    pub contact_id: Uuid,
    pub bank_id: Option<Uuid>,
    pub sku: String,
    pub sell_price: Decimal,
    pub bill_price: Decimal,
    pub paid_price: Decimal,
    pub is_broker: bool,
    pub broker: Option<Uuid>,
    pub broker_fee: Option<Decimal>,
    pub paid_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sales_order::Entity",
        from = "Column::SalesOrderId",
        to = "super::sales_order::Column::Id"
    )]
    SalesOrder,
}

impl Related<super::sales_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SalesOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
