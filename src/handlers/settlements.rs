use super::common::{
    map_service_error, success_response, validate_input, PaginatedResponse, PaginationParams,
};
use crate::{
    auth::RequestContext,
    errors::ApiError,
    handlers::AppState,
    services::settlements::{CommissionPaymentInput, PaymentInput},
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Request DTOs

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub bank_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CommissionPaymentRequest {
    pub amount: Decimal,
    pub bank_id: Option<Uuid>,
    pub bank_name: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
}

// Bill handlers

/// Get a bill by ID
#[utoipa::path(
    get,
    path = "/api/v1/bills/{id}",
    params(("id" = Uuid, Path, description = "Bill ID")),
    responses(
        (status = 200, description = "Bill fetched"),
        (status = 404, description = "Bill not found", body = crate::errors::ErrorResponse)
    ),
    tag = "settlement"
)]
pub async fn get_bill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let bill = state
        .services
        .settlements
        .get_bill(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Bill with ID {} not found", id)))?;

    Ok(success_response(bill))
}

/// List bills
#[utoipa::path(
    get,
    path = "/api/v1/bills",
    params(PaginationParams),
    responses((status = 200, description = "Bills listed")),
    tag = "settlement"
)]
pub async fn list_bills(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (bills, total) = state
        .services
        .settlements
        .list_bills(params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        bills,
        params.page,
        params.per_page,
        total,
    )))
}

/// Apply a payment toward a supplier bill
#[utoipa::path(
    post,
    path = "/api/v1/bills/{id}/payments",
    request_body = PaymentRequest,
    params(("id" = Uuid, Path, description = "Bill ID")),
    responses(
        (status = 200, description = "Payment applied"),
        (status = 404, description = "Bill not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Payment exceeds amount owed", body = crate::errors::ErrorResponse)
    ),
    tag = "settlement"
)]
pub async fn pay_bill(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ctx.require_role("finance").map_err(map_service_error)?;
    validate_input(&payload)?;

    let bill = state
        .services
        .settlements
        .pay_bill(
            id,
            PaymentInput {
                amount: payload.amount,
                bank_id: payload.bank_id,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!("Bill payment applied: {} ({})", id, bill.paid_status);

    Ok(success_response(bill))
}

// Invoice handlers

/// Get an invoice by ID
#[utoipa::path(
    get,
    path = "/api/v1/invoices/{id}",
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Invoice fetched"),
        (status = 404, description = "Invoice not found", body = crate::errors::ErrorResponse)
    ),
    tag = "settlement"
)]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let invoice = state
        .services
        .settlements
        .get_invoice(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Invoice with ID {} not found", id)))?;

    Ok(success_response(invoice))
}

/// List invoices
#[utoipa::path(
    get,
    path = "/api/v1/invoices",
    params(PaginationParams),
    responses((status = 200, description = "Invoices listed")),
    tag = "settlement"
)]
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (invoices, total) = state
        .services
        .settlements
        .list_invoices(params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        invoices,
        params.page,
        params.per_page,
        total,
    )))
}

/// Apply a payment toward a customer invoice
#[utoipa::path(
    post,
    path = "/api/v1/invoices/{id}/payments",
    request_body = PaymentRequest,
    params(("id" = Uuid, Path, description = "Invoice ID")),
    responses(
        (status = 200, description = "Payment applied"),
        (status = 404, description = "Invoice not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Payment exceeds amount owed", body = crate::errors::ErrorResponse)
    ),
    tag = "settlement"
)]
pub async fn pay_invoice(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ctx.require_role("finance").map_err(map_service_error)?;
    validate_input(&payload)?;

    let invoice = state
        .services
        .settlements
        .pay_invoice(
            id,
            PaymentInput {
                amount: payload.amount,
                bank_id: payload.bank_id,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!("Invoice payment applied: {} ({})", id, invoice.paid_status);

    Ok(success_response(invoice))
}

// Commission handlers

/// Get a commission by ID
#[utoipa::path(
    get,
    path = "/api/v1/commissions/{id}",
    params(("id" = Uuid, Path, description = "Commission ID")),
    responses(
        (status = 200, description = "Commission fetched"),
        (status = 404, description = "Commission not found", body = crate::errors::ErrorResponse)
    ),
    tag = "settlement"
)]
pub async fn get_commission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let commission = state
        .services
        .settlements
        .get_commission(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Commission with ID {} not found", id)))?;

    Ok(success_response(commission))
}

/// List commissions
#[utoipa::path(
    get,
    path = "/api/v1/commissions",
    params(PaginationParams),
    responses((status = 200, description = "Commissions listed")),
    tag = "settlement"
)]
pub async fn list_commissions(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (commissions, total) = state
        .services
        .settlements
        .list_commissions(params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(PaginatedResponse::new(
        commissions,
        params.page,
        params.per_page,
        total,
    )))
}

/// Apply a payment toward a broker commission
#[utoipa::path(
    post,
    path = "/api/v1/commissions/{id}/payments",
    request_body = CommissionPaymentRequest,
    params(("id" = Uuid, Path, description = "Commission ID")),
    responses(
        (status = 200, description = "Payment applied"),
        (status = 404, description = "Commission not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Payment exceeds amount owed", body = crate::errors::ErrorResponse)
    ),
    tag = "settlement"
)]
pub async fn pay_commission(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<CommissionPaymentRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    ctx.require_role("finance").map_err(map_service_error)?;
    validate_input(&payload)?;

    let commission = state
        .services
        .settlements
        .pay_commission(
            id,
            CommissionPaymentInput {
                amount: payload.amount,
                bank_id: payload.bank_id,
                bank_name: payload.bank_name,
                account_name: payload.account_name,
                account_number: payload.account_number,
            },
        )
        .await
        .map_err(map_service_error)?;

    info!(
        "Commission payment applied: {} ({})",
        id, commission.paid_status
    );

    Ok(success_response(commission))
}

// Routers

pub fn bill_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bills))
        .route("/:id", get(get_bill))
        .route("/:id/payments", post(pay_bill))
}

pub fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_invoices))
        .route("/:id", get(get_invoice))
        .route("/:id/payments", post(pay_invoice))
}

pub fn commission_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_commissions))
        .route("/:id", get(get_commission))
        .route("/:id/payments", post(pay_commission))
}
