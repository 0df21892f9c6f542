mod common;

use assert_matches::assert_matches;
use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use uuid::Uuid;

use common::{new_po_input, order_date, qty, received_date, TestApp};
use tradestock_api::{entities::bill, errors::ServiceError};

#[tokio::test]
async fn create_assigns_numbers_and_draft_status() {
    let app = TestApp::new().await;
    let warehouse = app.seed_warehouse().await;

    let order = app
        .state
        .services
        .purchase_orders
        .create_purchase_order(&app.ctx(), new_po_input(warehouse.id, "CTN-30S-001"))
        .await
        .expect("create purchase order");

    assert_eq!(order.po_number, "PO00001");
    assert_eq!(order.do_number, "INV/IN/2025/09/01/1");
    assert_eq!(order.status, "draft");
    assert_eq!(order.stock_roll, Decimal::from(100));
    assert_eq!(order.stock_roll_rev, Decimal::ZERO);
    assert_eq!(order.stock_kg_rev, Decimal::ZERO);
    assert_eq!(order.stock_rib_rev, Decimal::ZERO);
    assert!(order.date_received.is_none());

    // Sequence advances per purchase order
    let second = app
        .state
        .services
        .purchase_orders
        .create_purchase_order(&app.ctx(), new_po_input(warehouse.id, "CTN-30S-002"))
        .await
        .expect("create second purchase order");
    assert_eq!(second.po_number, "PO00002");
    assert_eq!(second.do_number, "INV/IN/2025/09/01/2");
}

#[tokio::test]
async fn create_rejects_duplicate_sku() {
    let app = TestApp::new().await;
    let warehouse = app.seed_warehouse().await;

    app.state
        .services
        .purchase_orders
        .create_purchase_order(&app.ctx(), new_po_input(warehouse.id, "CTN-30S-001"))
        .await
        .expect("create purchase order");

    let err = app
        .state
        .services
        .purchase_orders
        .create_purchase_order(&app.ctx(), new_po_input(warehouse.id, "CTN-30S-001"))
        .await
        .expect_err("duplicate SKU must be rejected");

    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn create_rejects_warehouse_outside_caller_store() {
    let app = TestApp::new().await;
    let foreign = app.seed_warehouse_for_store(Uuid::new_v4()).await;

    let err = app
        .state
        .services
        .purchase_orders
        .create_purchase_order(&app.ctx(), new_po_input(foreign.id, "CTN-30S-001"))
        .await
        .expect_err("foreign warehouse must be rejected");

    assert_matches!(err, ServiceError::Forbidden(_));
}

#[tokio::test]
async fn create_rejects_unknown_warehouse() {
    let app = TestApp::new().await;

    let err = app
        .state
        .services
        .purchase_orders
        .create_purchase_order(&app.ctx(), new_po_input(Uuid::new_v4(), "CTN-30S-001"))
        .await
        .expect_err("unknown warehouse must be rejected");

    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn receive_moves_ordered_stock_and_emits_bill() {
    let app = TestApp::new().await;
    let warehouse = app.seed_warehouse().await;
    let order = app
        .state
        .services
        .purchase_orders
        .create_purchase_order(&app.ctx(), new_po_input(warehouse.id, "CTN-30S-001"))
        .await
        .expect("create purchase order");

    let (updated, bill) = app
        .state
        .services
        .purchase_orders
        .receive(order.id, qty(30, 50, 20), received_date())
        .await
        .expect("receive stock");

    // Conservation: ordered decreases, revised increases, per dimension
    assert_eq!(updated.stock_roll, Decimal::from(70));
    assert_eq!(updated.stock_roll_rev, Decimal::from(30));
    assert_eq!(updated.stock_kg, Decimal::ZERO);
    assert_eq!(updated.stock_kg_rev, Decimal::from(50));
    assert_eq!(updated.stock_rib, Decimal::ZERO);
    assert_eq!(updated.stock_rib_rev, Decimal::from(20));
    assert_eq!(updated.status, "received");
    assert_eq!(updated.date_received, Some(received_date()));

    // Bill snapshots the received quantities and the order's unit price
    assert_eq!(bill.purchase_order_id, order.id);
    assert_eq!(bill.sku, order.sku);
    assert_eq!(bill.contact_id, order.contact_id);
    assert_eq!(bill.warehouse_id, order.warehouse_id);
    assert_eq!(bill.bill_price, Decimal::from(1000));
    assert_eq!(bill.payment, Decimal::ZERO);
    assert_eq!(bill.paid_status, "unpaid");
    assert_eq!(bill.stock_roll, Decimal::from(30));
    assert_eq!(bill.stock_kg, Decimal::from(50));
    assert_eq!(bill.stock_rib, Decimal::from(20));
}

#[tokio::test]
async fn receive_rejects_amount_exceeding_ordered_stock() {
    let app = TestApp::new().await;
    let warehouse = app.seed_warehouse().await;
    let order = app
        .state
        .services
        .purchase_orders
        .create_purchase_order(&app.ctx(), new_po_input(warehouse.id, "CTN-30S-001"))
        .await
        .expect("create purchase order");

    let err = app
        .state
        .services
        .purchase_orders
        .receive(order.id, qty(150, 0, 0), received_date())
        .await
        .expect_err("over-receiving must be rejected");

    assert_matches!(err, ServiceError::InsufficientStock(_));

    // Nothing persisted: the order is untouched and no bill exists
    let reloaded = app
        .state
        .services
        .purchase_orders
        .get(order.id)
        .await
        .expect("reload")
        .expect("order exists");
    assert_eq!(reloaded.stock_roll, Decimal::from(100));
    assert_eq!(reloaded.stock_roll_rev, Decimal::ZERO);
    assert_eq!(reloaded.status, "draft");

    let bills = bill::Entity::find()
        .count(&*app.state.db)
        .await
        .expect("count bills");
    assert_eq!(bills, 0);
}

#[tokio::test]
async fn receive_reaches_done_exactly_when_ordered_exhausted() {
    let app = TestApp::new().await;
    let warehouse = app.seed_warehouse().await;

    let mut input = new_po_input(warehouse.id, "CTN-30S-001");
    input.stock_roll = Decimal::from(100);
    input.stock_kg = Decimal::ZERO;
    input.stock_rib = Decimal::ZERO;

    let order = app
        .state
        .services
        .purchase_orders
        .create_purchase_order(&app.ctx(), input)
        .await
        .expect("create purchase order");

    let (after_first, first_bill) = app
        .state
        .services
        .purchase_orders
        .receive(order.id, qty(30, 0, 0), received_date())
        .await
        .expect("first receiving");
    assert_eq!(after_first.stock_roll, Decimal::from(70));
    assert_eq!(after_first.stock_roll_rev, Decimal::from(30));
    assert_eq!(after_first.status, "received");
    assert_eq!(first_bill.stock_roll, Decimal::from(30));

    let (after_second, _) = app
        .state
        .services
        .purchase_orders
        .receive(order.id, qty(70, 0, 0), received_date())
        .await
        .expect("second receiving");
    assert_eq!(after_second.stock_roll, Decimal::ZERO);
    assert_eq!(after_second.stock_roll_rev, Decimal::from(100));
    assert_eq!(after_second.status, "done");
}

#[tokio::test]
async fn zero_quantity_receive_never_changes_status() {
    let app = TestApp::new().await;
    let warehouse = app.seed_warehouse().await;
    let order = app
        .state
        .services
        .purchase_orders
        .create_purchase_order(&app.ctx(), new_po_input(warehouse.id, "CTN-30S-001"))
        .await
        .expect("create purchase order");

    let (after_zero, _) = app
        .state
        .services
        .purchase_orders
        .receive(order.id, qty(0, 0, 0), received_date())
        .await
        .expect("zero receive");
    assert_eq!(after_zero.status, "draft");

    let (after_real, _) = app
        .state
        .services
        .purchase_orders
        .receive(order.id, qty(10, 0, 0), received_date())
        .await
        .expect("real receive");
    assert_eq!(after_real.status, "received");

    let (after_zero_again, _) = app
        .state
        .services
        .purchase_orders
        .receive(order.id, qty(0, 0, 0), received_date())
        .await
        .expect("second zero receive");
    assert_eq!(after_zero_again.status, "received");
}

#[tokio::test]
async fn http_create_requires_role_and_identity() {
    let app = TestApp::new().await;
    let warehouse = app.seed_warehouse().await;

    let payload = json!({
        "contact_id": Uuid::new_v4(),
        "warehouse_id": warehouse.id,
        "sku": "CTN-30S-001",
        "item_name": "Cotton combed 30s",
        "order_date": order_date(),
        "stock_roll": "100",
        "stock_kg": "50",
        "stock_rib": "20",
        "price": "1000",
    });

    // No identity headers at all
    let response = app
        .request_anonymous(Method::POST, "/api/v1/purchase-orders", Some(payload.clone()))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Identity without the purchasing role
    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(payload.clone()),
            Some("sales"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Fully authorized
    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(payload),
            Some("purchasing"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn http_get_returns_404_for_missing_order() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/purchase-orders/{}", Uuid::new_v4()),
            None,
            Some("purchasing"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
