use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    auth::RequestContext,
    errors::ApiError,
    handlers::AppState,
    services::{purchase_orders::ReceivedQuantities, sales_orders::NewSalesOrder},
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Request DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSalesOrderRequest {
    pub contact_id: Uuid,
    /// SKU of the purchase order the sale draws stock from
    #[validate(length(min = 1))]
    pub sku: String,
    pub order_date: NaiveDate,
    /// Optional third-party broker entitled to a fee on this sale
    pub broker: Option<Uuid>,
    pub broker_fee: Option<Decimal>,
    pub stock_roll: Decimal,
    pub stock_kg: Decimal,
    pub stock_rib: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReceiveSalesOrderRequest {
    pub stock_roll: Decimal,
    pub stock_kg: Decimal,
    pub stock_rib: Decimal,
    pub received_date: NaiveDate,
}

// Handler functions

/// Create a sales order, debiting stock and emitting its invoice
/// (and commission for brokered sales) atomically
#[utoipa::path(
    post,
    path = "/api/v1/sales-orders",
    request_body = CreateSalesOrderRequest,
    responses(
        (status = 201, description = "Sales order, invoice, and optional commission created"),
        (status = 404, description = "No purchase order for the SKU", body = crate::errors::ErrorResponse),
        (status = 422, description = "Requested quantity exceeds available stock", body = crate::errors::ErrorResponse)
    ),
    tag = "sales-orders"
)]
pub async fn create_sales_order(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<CreateSalesOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ctx.require_role("sales").map_err(map_service_error)?;
    validate_input(&payload)?;

    let input = NewSalesOrder {
        contact_id: payload.contact_id,
        sku: payload.sku,
        order_date: payload.order_date,
        broker: payload.broker,
        broker_fee: payload.broker_fee,
        stock_roll: payload.stock_roll,
        stock_kg: payload.stock_kg,
        stock_rib: payload.stock_rib,
        price: payload.price,
    };

    let created = state
        .services
        .sales_orders
        .create_sales_order(input)
        .await
        .map_err(map_service_error)?;

    info!(
        "Sales order created: {} (invoice {})",
        created.sales_order.id, created.invoice.id
    );

    Ok(created_response(json!({
        "sales_order": created.sales_order,
        "invoice": created.invoice,
        "commission": created.commission,
    })))
}

/// Get a sales order by ID
#[utoipa::path(
    get,
    path = "/api/v1/sales-orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Sales order ID")
    ),
    responses(
        (status = 200, description = "Sales order fetched"),
        (status = 404, description = "Sales order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "sales-orders"
)]
pub async fn get_sales_order(
    State(state): State<AppState>,
    Path(so_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let order = state
        .services
        .sales_orders
        .get(so_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Sales order with ID {} not found", so_id)))?;

    Ok(success_response(order))
}

/// List sales orders
#[utoipa::path(
    get,
    path = "/api/v1/sales-orders",
    params(PaginationParams),
    responses(
        (status = 200, description = "Sales orders listed")
    ),
    tag = "sales-orders"
)]
pub async fn list_sales_orders(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (orders, total) = state
        .services
        .sales_orders
        .list(params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        orders,
        params.page,
        params.per_page,
        total,
    )))
}

/// Record a delivery confirmation against a sales order
#[utoipa::path(
    post,
    path = "/api/v1/sales-orders/{id}/receive",
    request_body = ReceiveSalesOrderRequest,
    params(
        ("id" = Uuid, Path, description = "Sales order ID")
    ),
    responses(
        (status = 200, description = "Delivery confirmed"),
        (status = 404, description = "Sales order not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Received quantity exceeds ordered stock", body = crate::errors::ErrorResponse)
    ),
    tag = "sales-orders"
)]
pub async fn receive_sales_order(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(so_id): Path<Uuid>,
    Json(payload): Json<ReceiveSalesOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ctx.require_role("sales").map_err(map_service_error)?;
    validate_input(&payload)?;

    let qty = ReceivedQuantities {
        stock_roll: payload.stock_roll,
        stock_kg: payload.stock_kg,
        stock_rib: payload.stock_rib,
    };

    let order = state
        .services
        .sales_orders
        .receive(so_id, qty, payload.received_date)
        .await
        .map_err(map_service_error)?;

    info!("Sales order delivery confirmed: {}", so_id);

    Ok(success_response(order))
}

/// Creates the router for sales order endpoints
pub fn sales_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_sales_order))
        .route("/", get(list_sales_orders))
        .route("/:id", get(get_sales_order))
        .route("/:id/receive", post(receive_sales_order))
}
