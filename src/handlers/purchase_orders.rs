use super::common::{
    created_response, map_service_error, success_response, validate_input, PaginatedResponse,
    PaginationParams,
};
use crate::{
    auth::RequestContext,
    errors::ApiError,
    handlers::AppState,
    services::purchase_orders::{
        NewPurchaseOrder, ReceivedQuantities, StockCorrection,
    },
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
pub struct CreatePurchaseOrderRequest {
    pub contact_id: Uuid,
    pub warehouse_id: Uuid,
    #[validate(length(min = 1))]
    pub sku: String,
    #[validate(length(min = 1))]
    pub item_name: String,
    pub grade: Option<String>,
    pub description: Option<String>,
    pub thickness: Option<String>,
    /// Stored filename of the attachment image, opaque to this API
    pub attachment: Option<String>,
    pub order_date: NaiveDate,
    pub stock_roll: Decimal,
    pub stock_kg: Decimal,
    pub stock_rib: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReceiveStockRequest {
    pub stock_roll: Decimal,
    pub stock_kg: Decimal,
    pub stock_rib: Decimal,
    pub received_date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct StockCorrectionRequest {
    /// One-time authorization token issued out of band
    #[validate(length(min = 1))]
    pub token: String,
    pub stock_roll: Option<Decimal>,
    pub stock_kg: Option<Decimal>,
    pub stock_rib: Option<Decimal>,
    pub stock_roll_rev: Option<Decimal>,
    pub stock_kg_rev: Option<Decimal>,
    pub stock_rib_rev: Option<Decimal>,
}

// Handler functions

/// Create a new purchase order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders",
    request_body = CreatePurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created"),
        (status = 403, description = "Warehouse outside the caller's store", body = crate::errors::ErrorResponse),
        (status = 409, description = "SKU already claimed by another purchase order", body = crate::errors::ErrorResponse),
        (status = 422, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ctx.require_role("purchasing").map_err(map_service_error)?;
    validate_input(&payload)?;

    let input = NewPurchaseOrder {
        contact_id: payload.contact_id,
        warehouse_id: payload.warehouse_id,
        sku: payload.sku,
        item_name: payload.item_name,
        grade: payload.grade,
        description: payload.description,
        thickness: payload.thickness,
        attachment: payload.attachment,
        order_date: payload.order_date,
        stock_roll: payload.stock_roll,
        stock_kg: payload.stock_kg,
        stock_rib: payload.stock_rib,
        price: payload.price,
    };

    let order = state
        .services
        .purchase_orders
        .create_purchase_order(&ctx, input)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order created: {}", order.id);

    Ok(created_response(order))
}

/// Get a purchase order by ID
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Purchase order ID")
    ),
    responses(
        (status = 200, description = "Purchase order fetched"),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let order = state
        .services
        .purchase_orders
        .get(po_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Purchase order with ID {} not found", po_id)))?;

    Ok(success_response(order))
}

/// List purchase orders
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders",
    params(PaginationParams),
    responses(
        (status = 200, description = "Purchase orders listed")
    ),
    tag = "purchase-orders"
)]
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (orders, total) = state
        .services
        .purchase_orders
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

/// Record a receiving event against a purchase order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/receive",
    request_body = ReceiveStockRequest,
    params(
        ("id" = Uuid, Path, description = "Purchase order ID")
    ),
    responses(
        (status = 200, description = "Stock received and bill emitted"),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Received quantity exceeds ordered stock", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn receive_purchase_order(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(po_id): Path<Uuid>,
    Json(payload): Json<ReceiveStockRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ctx.require_role("purchasing").map_err(map_service_error)?;
    validate_input(&payload)?;

    let qty = ReceivedQuantities {
        stock_roll: payload.stock_roll,
        stock_kg: payload.stock_kg,
        stock_rib: payload.stock_rib,
    };

    let (order, bill) = state
        .services
        .purchase_orders
        .receive(po_id, qty, payload.received_date)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order received: {} (bill {})", po_id, bill.id);

    Ok(success_response(json!({
        "purchase_order": order,
        "bill": bill,
    })))
}

/// Apply a token-gated stock correction to a purchase order
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/stock-correction",
    request_body = StockCorrectionRequest,
    params(
        ("id" = Uuid, Path, description = "Purchase order ID")
    ),
    responses(
        (status = 200, description = "Stock correction applied"),
        (status = 404, description = "Purchase order not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Token invalid or already used", body = crate::errors::ErrorResponse),
        (status = 422, description = "Invalid correction", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn correct_purchase_order_stock(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(po_id): Path<Uuid>,
    Json(payload): Json<StockCorrectionRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ctx.require_role("purchasing").map_err(map_service_error)?;
    validate_input(&payload)?;

    let correction = StockCorrection {
        stock_roll: payload.stock_roll,
        stock_kg: payload.stock_kg,
        stock_rib: payload.stock_rib,
        stock_roll_rev: payload.stock_roll_rev,
        stock_kg_rev: payload.stock_kg_rev,
        stock_rib_rev: payload.stock_rib_rev,
    };

    let order = state
        .services
        .purchase_orders
        .apply_stock_correction(&ctx, po_id, &payload.token, correction)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order stock corrected: {}", po_id);

    Ok(success_response(order))
}

/// Creates the router for purchase order endpoints
pub fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_purchase_order))
        .route("/", get(list_purchase_orders))
        .route("/:id", get(get_purchase_order))
        .route("/:id/receive", post(receive_purchase_order))
        .route("/:id/stock-correction", post(correct_purchase_order_stock))
}
