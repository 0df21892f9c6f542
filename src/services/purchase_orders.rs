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
    auth::RequestContext,
    entities::{
        bill,
        purchase_order::{self, Entity as PurchaseOrderEntity},
        update_token::{self, Entity as UpdateTokenEntity},
        warehouse::Entity as WarehouseEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::{
        sequences::{self, DeliveryDirection, DocumentType},
        DocumentStatus, PaidStatus,
    },
};

const TOKEN_UNUSED: &str = "unused";
const TOKEN_USED: &str = "used";

/// Fields accepted when creating a purchase order. Ordered quantities are
/// what the supplier owes; nothing is available for sale until received.
#[derive(Debug, Clone)]
pub struct NewPurchaseOrder {
    pub contact_id: Uuid,
    pub warehouse_id: Uuid,
    pub sku: String,
    pub item_name: String,
    pub grade: Option<String>,
    pub description: Option<String>,
    pub thickness: Option<String>,
    pub attachment: Option<String>,
    pub order_date: NaiveDate,
    pub stock_roll: Decimal,
    pub stock_kg: Decimal,
    pub stock_rib: Decimal,
    pub price: Decimal,
}

/// Quantities confirmed in one receiving event, per dimension.
#[derive(Debug, Clone, Copy)]
pub struct ReceivedQuantities {
    pub stock_roll: Decimal,
    pub stock_kg: Decimal,
    pub stock_rib: Decimal,
}

impl ReceivedQuantities {
    pub fn is_empty(&self) -> bool {
        self.stock_roll.is_zero() && self.stock_kg.is_zero() && self.stock_rib.is_zero()
    }

    fn validate(&self) -> Result<(), ServiceError> {
        for (name, qty) in [
            ("stock_roll", self.stock_roll),
            ("stock_kg", self.stock_kg),
            ("stock_rib", self.stock_rib),
        ] {
            if qty < Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "received {} cannot be negative",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Whitelisted stock counters a token-gated correction may overwrite.
/// Omitted fields keep their current values.
#[derive(Debug, Clone, Copy, Default)]
pub struct StockCorrection {
    pub stock_roll: Option<Decimal>,
    pub stock_kg: Option<Decimal>,
    pub stock_rib: Option<Decimal>,
    pub stock_roll_rev: Option<Decimal>,
    pub stock_kg_rev: Option<Decimal>,
    pub stock_rib_rev: Option<Decimal>,
}

/// Purchase intake: order creation, receiving (with Bill emission), and
/// token-gated stock corrections.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<EventSender>,
}

impl PurchaseOrderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Creates a purchase order in the caller's store.
    ///
    /// The target warehouse must belong to the caller's store, and the SKU
    /// must not already be claimed by another purchase order: sales orders
    /// resolve their stock source by SKU, so each SKU has exactly one
    /// active purchase order.
    #[instrument(skip(self, ctx, input), fields(sku = %input.sku))]
    pub async fn create_purchase_order(
        &self,
        ctx: &RequestContext,
        input: NewPurchaseOrder,
    ) -> Result<purchase_order::Model, ServiceError> {
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

        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let warehouse = WarehouseEntity::find_by_id(input.warehouse_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Warehouse {} not found", input.warehouse_id))
            })?;

        if warehouse.store_id != ctx.store_id {
            return Err(ServiceError::Forbidden(format!(
                "warehouse {} does not belong to the caller's store",
                warehouse.id
            )));
        }

        let duplicate = PurchaseOrderEntity::find()
            .filter(purchase_order::Column::Sku.eq(input.sku.as_str()))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "a purchase order for SKU {} already exists",
                input.sku
            )));
        }

        let seq = sequences::next_value(&txn, DocumentType::PurchaseOrder).await?;
        let now = Utc::now();

        let order = purchase_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            contact_id: Set(input.contact_id),
            warehouse_id: Set(input.warehouse_id),
            po_number: Set(sequences::po_number(seq)),
            do_number: Set(sequences::delivery_number(
                DeliveryDirection::Inbound,
                input.order_date,
                seq,
            )),
            sku: Set(input.sku),
            item_name: Set(input.item_name),
            grade: Set(input.grade),
            description: Set(input.description),
            thickness: Set(input.thickness),
            attachment: Set(input.attachment),
            order_date: Set(input.order_date),
            date_received: Set(None),
            status: Set(DocumentStatus::Draft.to_string()),
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

        let created = order.insert(&txn).await.map_err(|e| {
            error!("Failed to create purchase order: {}", e);
            ServiceError::db_error(e)
        })?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::PurchaseOrderCreated(created.id))
                .await;
        }

        info!(
            "Purchase order created: {} ({})",
            created.po_number, created.sku
        );

        Ok(created)
    }

    /// Records a receiving event against a purchase order.
    ///
    /// Moves the received amounts from the ordered pool into the
    /// available-for-sale pool, derives the order status, and emits a Bill
    /// for the amount owed to the supplier. The stock mutation and the Bill
    /// insert commit or roll back together.
    #[instrument(skip(self))]
    pub async fn receive(
        &self,
        po_id: Uuid,
        qty: ReceivedQuantities,
        received_date: NaiveDate,
    ) -> Result<(purchase_order::Model, bill::Model), ServiceError> {
        qty.validate()?;

        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let order = PurchaseOrderEntity::find_by_id(po_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", po_id))
            })?;

        // Received amounts are checked against the ordered pool, not the
        // revised pool: receiving can never exceed what is still on order.
        for (name, received, ordered) in [
            ("stock_roll", qty.stock_roll, order.stock_roll),
            ("stock_kg", qty.stock_kg, order.stock_kg),
            ("stock_rib", qty.stock_rib, order.stock_rib),
        ] {
            if received > ordered {
                return Err(ServiceError::InsufficientStock(format!(
                    "received {} {} exceeds available stock ({} on order)",
                    received, name, ordered
                )));
            }
        }

        let new_roll = order.stock_roll - qty.stock_roll;
        let new_kg = order.stock_kg - qty.stock_kg;
        let new_rib = order.stock_rib - qty.stock_rib;
        let new_roll_rev = order.stock_roll_rev + qty.stock_roll;
        let new_kg_rev = order.stock_kg_rev + qty.stock_kg;
        let new_rib_rev = order.stock_rib_rev + qty.stock_rib;

        let status = if new_roll.is_zero() && new_kg.is_zero() && new_rib.is_zero() {
            DocumentStatus::Done.to_string()
        } else if !qty.is_empty() {
            DocumentStatus::Received.to_string()
        } else {
            order.status.clone()
        };

        let contact_id = order.contact_id;
        let warehouse_id = order.warehouse_id;
        let sku = order.sku.clone();
        let unit_price = order.price;
        let now = Utc::now();

        let mut active: purchase_order::ActiveModel = order.into();
        active.stock_roll = Set(new_roll);
        active.stock_kg = Set(new_kg);
        active.stock_rib = Set(new_rib);
        active.stock_roll_rev = Set(new_roll_rev);
        active.stock_kg_rev = Set(new_kg_rev);
        active.stock_rib_rev = Set(new_rib_rev);
        active.date_received = Set(Some(received_date));
        active.status = Set(status.clone());
        active.updated_at = Set(now);

        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;

        let bill = bill::ActiveModel {
            id: Set(Uuid::new_v4()),
            purchase_order_id: Set(po_id),
            contact_id: Set(contact_id),
            warehouse_id: Set(warehouse_id),
            sku: Set(sku),
            bill_price: Set(unit_price),
            payment: Set(Decimal::ZERO),
            bank_id: Set(None),
            stock_roll: Set(qty.stock_roll),
            stock_kg: Set(qty.stock_kg),
            stock_rib: Set(qty.stock_rib),
            paid_status: Set(PaidStatus::Unpaid.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let bill = bill.insert(&txn).await.map_err(|e| {
            error!("Failed to create bill for purchase order {}: {}", po_id, e);
            ServiceError::db_error(e)
        })?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::PurchaseOrderReceived {
                    purchase_order_id: po_id,
                    bill_id: bill.id,
                    status: status.clone(),
                })
                .await;
        }

        info!(
            "Purchase order {} received: roll={} kg={} rib={} (status: {})",
            po_id, qty.stock_roll, qty.stock_kg, qty.stock_rib, status
        );

        Ok((updated, bill))
    }

    /// Applies a token-gated stock correction to a purchase order.
    ///
    /// The token is consumed and the correction applied in one transaction:
    /// a failure anywhere leaves the token unspent and the order untouched.
    #[instrument(skip(self, ctx, correction, token_value))]
    pub async fn apply_stock_correction(
        &self,
        ctx: &RequestContext,
        po_id: Uuid,
        token_value: &str,
        correction: StockCorrection,
    ) -> Result<purchase_order::Model, ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let token = UpdateTokenEntity::find()
            .filter(update_token::Column::Token.eq(token_value))
            .filter(update_token::Column::Status.eq(TOKEN_UNUSED))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::Conflict("update token invalid or already used".to_string())
            })?;

        let order = PurchaseOrderEntity::find_by_id(po_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", po_id))
            })?;

        let stock_roll = correction.stock_roll.unwrap_or(order.stock_roll);
        let stock_kg = correction.stock_kg.unwrap_or(order.stock_kg);
        let stock_rib = correction.stock_rib.unwrap_or(order.stock_rib);
        let stock_roll_rev = correction.stock_roll_rev.unwrap_or(order.stock_roll_rev);
        let stock_kg_rev = correction.stock_kg_rev.unwrap_or(order.stock_kg_rev);
        let stock_rib_rev = correction.stock_rib_rev.unwrap_or(order.stock_rib_rev);

        for (name, value) in [
            ("stock_roll", stock_roll),
            ("stock_kg", stock_kg),
            ("stock_rib", stock_rib),
            ("stock_roll_rev", stock_roll_rev),
            ("stock_kg_rev", stock_kg_rev),
            ("stock_rib_rev", stock_rib_rev),
        ] {
            if value < Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "corrected {} cannot be negative",
                    name
                )));
            }
        }

        let token_id = token.id;
        let now = Utc::now();

        let mut active: purchase_order::ActiveModel = order.into();
        active.stock_roll = Set(stock_roll);
        active.stock_kg = Set(stock_kg);
        active.stock_rib = Set(stock_rib);
        active.stock_roll_rev = Set(stock_roll_rev);
        active.stock_kg_rev = Set(stock_kg_rev);
        active.stock_rib_rev = Set(stock_rib_rev);
        active.updated_at = Set(now);

        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;

        let mut spent: update_token::ActiveModel = token.into();
        spent.status = Set(TOKEN_USED.to_string());
        spent.used_by = Set(Some(ctx.user_id));
        spent.used_at = Set(Some(now));
        spent.update(&txn).await.map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        if let Some(sender) = &self.event_sender {
            sender
                .send_or_log(Event::PurchaseOrderCorrected {
                    purchase_order_id: po_id,
                    token_id,
                })
                .await;
        }

        info!("Purchase order {} corrected via token {}", po_id, token_id);

        Ok(updated)
    }

    /// Fetches a purchase order by id.
    pub async fn get(&self, po_id: Uuid) -> Result<Option<purchase_order::Model>, ServiceError> {
        PurchaseOrderEntity::find_by_id(po_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Lists purchase orders newest-first with the total row count.
    pub async fn list(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<purchase_order::Model>, u64), ServiceError> {
        let paginator = PurchaseOrderEntity::find()
            .order_by_desc(purchase_order::Column::CreatedAt)
            .paginate(&*self.db, limit.max(1));

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        Ok((items, total))
    }
}
