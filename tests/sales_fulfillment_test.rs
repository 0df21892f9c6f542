mod common;

use assert_matches::assert_matches;
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

use common::{new_po_input, order_date, qty, received_date, TestApp};
use tradestock_api::{
    entities::{commission, invoice, purchase_order, sales_order},
    errors::ServiceError,
    services::sales_orders::NewSalesOrder,
};

fn new_so_input(sku: &str) -> NewSalesOrder {
    NewSalesOrder {
        contact_id: Uuid::new_v4(),
        sku: sku.to_string(),
        order_date: order_date(),
        broker: None,
        broker_fee: None,
        stock_roll: Decimal::from(20),
        stock_kg: Decimal::from(10),
        stock_rib: Decimal::from(5),
        price: Decimal::from(1500),
    }
}

/// Creates a purchase order and receives it in full, so its entire ordered
/// quantity is available for sale.
async fn seed_available_stock(app: &TestApp, sku: &str) -> purchase_order::Model {
    let warehouse = app.seed_warehouse().await;
    let order = app
        .state
        .services
        .purchase_orders
        .create_purchase_order(&app.ctx(), new_po_input(warehouse.id, sku))
        .await
        .expect("create purchase order");

    let (received, _) = app
        .state
        .services
        .purchase_orders
        .receive(order.id, qty(100, 50, 20), received_date())
        .await
        .expect("receive purchase order in full");

    received
}

#[tokio::test]
async fn create_debits_source_and_creates_invoice() {
    let app = TestApp::new().await;
    let source = seed_available_stock(&app, "CTN-30S-001").await;

    let created = app
        .state
        .services
        .sales_orders
        .create_sales_order(new_so_input("CTN-30S-001"))
        .await
        .expect("create sales order");

    let so = &created.sales_order;
    assert_eq!(so.so_number, "SO00001");
    assert_eq!(so.do_number, "INV/OUT/2025/09/01/1");
    assert_eq!(so.status, "draft");
    assert_eq!(so.warehouse_id, source.warehouse_id);
    // Descriptive fields are copied from the source purchase order
    assert_eq!(so.item_name, source.item_name);
    assert_eq!(so.grade, source.grade);
    assert_eq!(so.thickness, source.thickness);
    assert_eq!(so.stock_roll, Decimal::from(20));
    assert_eq!(so.stock_roll_rev, Decimal::ZERO);

    // The source order's available stock is debited
    let debited = app
        .state
        .services
        .purchase_orders
        .get(source.id)
        .await
        .expect("reload source")
        .expect("source exists");
    assert_eq!(debited.stock_roll_rev, Decimal::from(80));
    assert_eq!(debited.stock_kg_rev, Decimal::from(40));
    assert_eq!(debited.stock_rib_rev, Decimal::from(15));

    // Invoice starts unpaid for the sell price
    let inv = &created.invoice;
    assert_eq!(inv.sales_order_id, so.id);
    assert_eq!(inv.invoice_number, "INVOICE/2025/09/01/1");
    assert_eq!(inv.sell_price, Decimal::from(1500));
    assert_eq!(inv.bill_price, Decimal::from(1500));
    assert_eq!(inv.paid_price, Decimal::ZERO);
    assert_eq!(inv.paid_status, "unpaid");
    assert!(!inv.is_broker);

    assert!(created.commission.is_none());
}

#[tokio::test]
async fn brokered_sale_creates_commission() {
    let app = TestApp::new().await;
    seed_available_stock(&app, "CTN-30S-001").await;

    let broker = Uuid::new_v4();
    let mut input = new_so_input("CTN-30S-001");
    input.broker = Some(broker);
    input.broker_fee = Some(Decimal::from(200));

    let created = app
        .state
        .services
        .sales_orders
        .create_sales_order(input)
        .await
        .expect("create brokered sales order");

    assert!(created.invoice.is_broker);

    let commission = created.commission.expect("commission for brokered sale");
    assert_eq!(commission.commission_number, "COMMISIONS/2025/09/01/1");
    assert_eq!(commission.invoice_number, created.invoice.invoice_number);
    assert_eq!(commission.broker, broker);
    assert_eq!(commission.broker_fee, Decimal::from(200));
    assert_eq!(commission.payment, Decimal::ZERO);
    assert_eq!(commission.paid_status, "unpaid");
}

#[tokio::test]
async fn broker_without_fee_creates_no_commission() {
    let app = TestApp::new().await;
    seed_available_stock(&app, "CTN-30S-001").await;

    let mut input = new_so_input("CTN-30S-001");
    input.broker = Some(Uuid::new_v4());
    input.broker_fee = None;

    let created = app
        .state
        .services
        .sales_orders
        .create_sales_order(input)
        .await
        .expect("create sales order");

    assert!(!created.invoice.is_broker);
    assert!(created.commission.is_none());
}

#[tokio::test]
async fn create_rejects_overdraw_and_writes_nothing() {
    let app = TestApp::new().await;
    let warehouse = app.seed_warehouse().await;
    let order = app
        .state
        .services
        .purchase_orders
        .create_purchase_order(&app.ctx(), new_po_input(warehouse.id, "CTN-30S-001"))
        .await
        .expect("create purchase order");

    // Only 40 kg available for sale
    app.state
        .services
        .purchase_orders
        .receive(order.id, qty(100, 40, 20), received_date())
        .await
        .expect("receive purchase order");

    let mut input = new_so_input("CTN-30S-001");
    input.stock_kg = Decimal::from(50);

    let err = app
        .state
        .services
        .sales_orders
        .create_sales_order(input)
        .await
        .expect_err("overdraw must be rejected");
    assert_matches!(err, ServiceError::InsufficientStock(_));

    // The purchase order's available stock is unchanged and no documents exist
    let reloaded = app
        .state
        .services
        .purchase_orders
        .get(order.id)
        .await
        .expect("reload")
        .expect("order exists");
    assert_eq!(reloaded.stock_kg_rev, Decimal::from(40));
    assert_eq!(reloaded.stock_roll_rev, Decimal::from(100));

    let so_count = sales_order::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count sales orders");
    let invoice_count = invoice::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count invoices");
    let commission_count = commission::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count commissions");
    assert_eq!(so_count, 0);
    assert_eq!(invoice_count, 0);
    assert_eq!(commission_count, 0);
}

#[tokio::test]
async fn create_rejects_self_dealing_broker() {
    let app = TestApp::new().await;
    seed_available_stock(&app, "CTN-30S-001").await;

    let contact = Uuid::new_v4();
    let mut input = new_so_input("CTN-30S-001");
    input.contact_id = contact;
    input.broker = Some(contact);
    input.broker_fee = Some(Decimal::from(100));

    let err = app
        .state
        .services
        .sales_orders
        .create_sales_order(input)
        .await
        .expect_err("self-dealing must be rejected");
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn create_rejects_unknown_sku() {
    let app = TestApp::new().await;

    let err = app
        .state
        .services
        .sales_orders
        .create_sales_order(new_so_input("NO-SUCH-SKU"))
        .await
        .expect_err("unknown SKU must be rejected");
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn receive_accumulates_toward_ordered_quantities() {
    let app = TestApp::new().await;
    seed_available_stock(&app, "CTN-30S-001").await;

    let created = app
        .state
        .services
        .sales_orders
        .create_sales_order(new_so_input("CTN-30S-001"))
        .await
        .expect("create sales order");
    let so_id = created.sales_order.id;

    // Partial confirmation
    let partial = app
        .state
        .services
        .sales_orders
        .receive(so_id, qty(10, 10, 5), received_date())
        .await
        .expect("partial delivery confirmation");
    assert_eq!(partial.stock_roll_rev, Decimal::from(10));
    assert_eq!(partial.status, "received");

    // Remaining confirmation completes the order
    let done = app
        .state
        .services
        .sales_orders
        .receive(so_id, qty(10, 0, 0), received_date())
        .await
        .expect("final delivery confirmation");
    assert_eq!(done.stock_roll_rev, Decimal::from(20));
    assert_eq!(done.stock_kg_rev, Decimal::from(10));
    assert_eq!(done.stock_rib_rev, Decimal::from(5));
    assert_eq!(done.status, "done");

    // Confirming beyond the ordered quantity is rejected
    let err = app
        .state
        .services
        .sales_orders
        .receive(so_id, qty(1, 0, 0), received_date())
        .await
        .expect_err("over-confirmation must be rejected");
    assert_matches!(err, ServiceError::InsufficientStock(_));
}

#[tokio::test]
async fn zero_quantity_receive_keeps_sales_order_status() {
    let app = TestApp::new().await;
    seed_available_stock(&app, "CTN-30S-001").await;

    let created = app
        .state
        .services
        .sales_orders
        .create_sales_order(new_so_input("CTN-30S-001"))
        .await
        .expect("create sales order");

    let after_zero = app
        .state
        .services
        .sales_orders
        .receive(created.sales_order.id, qty(0, 0, 0), received_date())
        .await
        .expect("zero confirmation");
    assert_eq!(after_zero.status, "draft");
}
