use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    entities::{
        commission, invoice,
        purchase_order::{self, Entity as PurchaseOrderEntity},
        sales_order::{self, Entity as SalesOrderEntity},
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        purchase_orders::ReceivedQuantities,
        sequences::{self, DeliveryDirection, DocumentType},
        DocumentStatus, PaidStatus,
    },
};

/// Fields accepted when creating a sales order. The stock source is
/// resolved by SKU; descriptive fields are copied from it.
#[derive(Debug, Clone)]
pub struct NewSalesOrder {
    pub contact_id: Uuid,
    pub sku: String,
    pub order_date: NaiveDate,
    pub broker: Option<Uuid>,
    pub broker_fee: Option<Decimal>,
    pub stock_roll: Decimal,
    pub stock_kg: Decimal,
    pub stock_rib: Decimal,
    pub price: Decimal,
}

/// The documents created atomically by one sales-order creation.
#[derive(Debug, Clone)]
pub struct CreatedSalesOrder {
    pub sales_order: sales_order::Model,
    pub invoice: invoice::Model,
    pub commission: Option<commission::Model>,
}

/// Sales fulfillment: debits available stock from a purchase order and
/// emits the sales order, its invoice, and (for brokered sales) the
/// commission in one transaction.
#[derive(Clone)]
pub struct SalesOrderService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<EventSender>,
}

impl SalesOrderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Creates a sales order against the purchase order holding its SKU.
    ///
    /// Either the whole triple (sales order, invoice, commission) lands and
    /// the purchase order is debited, or nothing is written.
    #[instrument(skip(self, input), fields(sku = %input.sku))]
    pub async fn create_sales_order(
        &self,
        input: NewSalesOrder,
    ) -> Result<CreatedSalesOrder, ServiceError> {
        for (name, value) in [
            ("stock_roll", input.stock_roll),
            ("stock_kg", input.stock_kg),
            ("stock_rib", input.stock_rib),
            ("price", input.price),
        ] {
            if value < Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "{} cannot be negative",
                    name
                )));
            }
        }
        if let Some(fee) = input.broker_fee {
            if fee < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "broker_fee cannot be negative".to_string(),
                ));
            }
        }
        if input.broker == Some(input.contact_id) {
            return Err(ServiceError::ValidationError(
                "broker must differ from the buying contact".to_string(),
            ));
        }

        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let source = PurchaseOrderEntity::find()
            .filter(purchase_order::Column::Sku.eq(input.sku.as_str()))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("No purchase order found for SKU {}", input.sku))
            })?;

        // Requested amounts draw on the revised (received-and-available)
        // pool; the ordered pool is still with the supplier.
        for (name, requested, available) in [
            ("stock_roll", input.stock_roll, source.stock_roll_rev),
            ("stock_kg", input.stock_kg, source.stock_kg_rev),
            ("stock_rib", input.stock_rib, source.stock_rib_rev),
        ] {
            if requested > available {
                return Err(ServiceError::InsufficientStock(format!(
                    "requested {} {} exceeds available stock ({} available)",
                    requested, name, available
                )));
            }
        }

        let warehouse_id = source.warehouse_id;
        let item_name = source.item_name.clone();
        let grade = source.grade.clone();
        let description = source.description.clone();
        let thickness = source.thickness.clone();
        let attachment = source.attachment.clone();

        let new_roll_rev = source.stock_roll_rev - input.stock_roll;
        let new_kg_rev = source.stock_kg_rev - input.stock_kg;
        let new_rib_rev = source.stock_rib_rev - input.stock_rib;
        let now = Utc::now();

        let mut debited: purchase_order::ActiveModel = source.into();
        debited.stock_roll_rev = Set(new_roll_rev);
        debited.stock_kg_rev = Set(new_kg_rev);
        debited.stock_rib_rev = Set(new_rib_rev);
        debited.updated_at = Set(now);
        debited.update(&txn).await.map_err(ServiceError::db_error)?;

        let is_broker = input.broker.is_some() && input.broker_fee.is_some();

        let so_seq = sequences::next_value(&txn, DocumentType::SalesOrder).await?;
        let order = sales_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            contact_id: Set(input.contact_id),
            warehouse_id: Set(warehouse_id),
            so_number: Set(sequences::so_number(so_seq)),
            do_number: Set(sequences::delivery_number(
                DeliveryDirection::Outbound,
                input.order_date,
                so_seq,
            )),
            sku: Set(input.sku.clone()),
            item_name: Set(item_name),
            grade: Set(grade),
            description: Set(description),
            thickness: Set(thickness),
            attachment: Set(attachment),
            order_date: Set(input.order_date),
            date_received: Set(None),
            status: Set(DocumentStatus::Draft.to_string()),
            broker: Set(input.broker),
            broker_fee: Set(input.broker_fee),
            stock_roll: Set(input.stock_roll),
            stock_kg: Set(input.stock_kg),
            stock_rib: Set(input.stock_rib),
            stock_roll_rev: Set(Decimal::ZERO),
            stock_kg_rev: Set(Decimal::ZERO),
            stock_rib_rev: Set(Decimal::ZERO),
            price: Set(input.price),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let order = order.insert(&txn).await.map_err(|e| {
            error!("Failed to create sales order: {}", e);
            ServiceError::db_error(e)
        })?;

        let invoice_seq = sequences::next_value(&txn, DocumentType::Invoice).await?;
        let invoice = invoice::ActiveModel {
            id: Set(Uuid::new_v4()),
            sales_order_id: Set(order.id),
            invoice_number: Set(sequences::invoice_number(input.order_date, invoice_seq)),
            warehouse_id: Set(warehouse_id),
            contact_id: Set(input.contact_id),
            bank_id: Set(None),
            sku: Set(input.sku.clone()),
            sell_price: Set(input.price),
            bill_price: Set(input.price),
            paid_price: Set(Decimal::ZERO),
            is_broker: Set(is_broker),
            broker: Set(input.broker),
            broker_fee: Set(input.broker_fee),
            paid_status: Set(PaidStatus::Unpaid.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let invoice = invoice.insert(&txn).await.map_err(|e| {
            error!("Failed to create invoice for sales order {}: {}", order.id, e);
            ServiceError::db_error(e)
        })?;

        let commission = match (input.broker, input.broker_fee) {
            (Some(broker), Some(broker_fee)) => {
                let commission_seq = sequences::next_value(&txn, DocumentType::Commission).await?;
                let model = commission::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    commission_number: Set(sequences::commission_number(
                        input.order_date,
                        commission_seq,
                    )),
                    invoice_number: Set(invoice.invoice_number.clone()),
                    broker: Set(broker),
                    broker_fee: Set(broker_fee),
                    payment: Set(Decimal::ZERO),
                    bank_id: Set(None),
                    bank_name: Set(None),
                    account_name: Set(None),
                    account_number: Set(None),
                    paid_status: Set(PaidStatus::Unpaid.to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };

                Some(model.insert(&txn).await.map_err(|e| {
                    error!(
                        "Failed to create commission for invoice {}: {}",
                        invoice.invoice_number, e
                    );
                    ServiceError::db_error(e)
                })?)
            }
            _ => None,
        };

        txn.commit().await.map_err(ServiceError::db_error)?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::SalesOrderCreated {
                    sales_order_id: order.id,
                    invoice_id: invoice.id,
                    commission_id: commission.as_ref().map(|c| c.id),
                })
                .await;
        }

        info!(
            "Sales order created: {} ({}) invoice {}",
            order.so_number, order.sku, invoice.invoice_number
        );

        Ok(CreatedSalesOrder {
            sales_order: order,
            invoice,
            commission,
        })
    }

    /// Records a delivery confirmation against a sales order.
    ///
    /// Confirmed amounts accumulate in the `*_rev` counters toward the
    /// ordered quantities; no downstream document is created here, because
    /// the invoice already exists from creation time.
    #[instrument(skip(self))]
    pub async fn receive(
        &self,
        so_id: Uuid,
        qty: ReceivedQuantities,
        received_date: NaiveDate,
    ) -> Result<sales_order::Model, ServiceError> {
        for (name, value) in [
            ("stock_roll", qty.stock_roll),
            ("stock_kg", qty.stock_kg),
            ("stock_rib", qty.stock_rib),
        ] {
            if value < Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "received {} cannot be negative",
                    name
                )));
            }
        }

        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let order = SalesOrderEntity::find_by_id(so_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Sales order {} not found", so_id)))?;

        for (name, received, confirmed, ordered) in [
            (
                "stock_roll",
                qty.stock_roll,
                order.stock_roll_rev,
                order.stock_roll,
            ),
            ("stock_kg", qty.stock_kg, order.stock_kg_rev, order.stock_kg),
            (
                "stock_rib",
                qty.stock_rib,
                order.stock_rib_rev,
                order.stock_rib,
            ),
        ] {
            if confirmed + received > ordered {
                return Err(ServiceError::InsufficientStock(format!(
                    "received {} {} exceeds available stock ({} of {} confirmed)",
                    received, name, confirmed, ordered
                )));
            }
        }

        let new_roll_rev = order.stock_roll_rev + qty.stock_roll;
        let new_kg_rev = order.stock_kg_rev + qty.stock_kg;
        let new_rib_rev = order.stock_rib_rev + qty.stock_rib;

        let fully_confirmed = new_roll_rev == order.stock_roll
            && new_kg_rev == order.stock_kg
            && new_rib_rev == order.stock_rib;

        let status = if fully_confirmed {
            DocumentStatus::Done.to_string()
        } else if !qty.is_empty() {
            DocumentStatus::Received.to_string()
        } else {
            order.status.clone()
        };

        let now = Utc::now();
        let mut active: sales_order::ActiveModel = order.into();
        active.stock_roll_rev = Set(new_roll_rev);
        active.stock_kg_rev = Set(new_kg_rev);
        active.stock_rib_rev = Set(new_rib_rev);
        active.date_received = Set(Some(received_date));
        active.status = Set(status.clone());
        active.updated_at = Set(now);

        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::SalesOrderReceived {
                    sales_order_id: so_id,
                    status: status.clone(),
                })
                .await;
        }

        info!(
            "Sales order {} delivery confirmed: roll={} kg={} rib={} (status: {})",
            so_id, qty.stock_roll, qty.stock_kg, qty.stock_rib, status
        );

        Ok(updated)
    }

    /// Fetches a sales order by id.
    pub async fn get(&self, so_id: Uuid) -> Result<Option<sales_order::Model>, ServiceError> {
        SalesOrderEntity::find_by_id(so_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Lists sales orders newest-first with the total row count.
    pub async fn list(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<sales_order::Model>, u64), ServiceError> {
        let paginator = SalesOrderEntity::find()
            .order_by_desc(sales_order::Column::CreatedAt)
            .paginate(&*self.db, limit.max(1));

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((items, total))
    }
}
