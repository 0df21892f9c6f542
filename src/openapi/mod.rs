use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tradestock API",
        version = "0.3.0",
        description = r#"
# Tradestock Inventory & Trade-Accounting API

Back-office API for a multi-store goods-trading business: purchase intake,
stock receiving, sales fulfillment, and settlement of bills, invoices, and
broker commissions.

## Authentication

Requests are authenticated upstream; the gateway forwards the caller's
identity in the `x-user-id`, `x-store-id`, and `x-roles` headers.

## Error Handling

Failures return a structured error body with appropriate status codes:
404 for missing entities, 422 for business-rule violations, 409 for
conflicts such as an already-used authorization token.

## Pagination

List endpoints accept `page` and `per_page` query parameters.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "purchase-orders", description = "Purchase intake and receiving"),
        (name = "sales-orders", description = "Sales fulfillment and delivery confirmation"),
        (name = "settlement", description = "Bill, invoice, and commission payments")
    ),
    paths(
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::get_purchase_order,
        crate::handlers::purchase_orders::list_purchase_orders,
        crate::handlers::purchase_orders::receive_purchase_order,
        crate::handlers::purchase_orders::correct_purchase_order_stock,
        crate::handlers::sales_orders::create_sales_order,
        crate::handlers::sales_orders::get_sales_order,
        crate::handlers::sales_orders::list_sales_orders,
        crate::handlers::sales_orders::receive_sales_order,
        crate::handlers::settlements::get_bill,
        crate::handlers::settlements::list_bills,
        crate::handlers::settlements::pay_bill,
        crate::handlers::settlements::get_invoice,
        crate::handlers::settlements::list_invoices,
        crate::handlers::settlements::pay_invoice,
        crate::handlers::settlements::get_commission,
        crate::handlers::settlements::list_commissions,
        crate::handlers::settlements::pay_commission,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::purchase_orders::CreatePurchaseOrderRequest,
        crate::handlers::purchase_orders::ReceiveStockRequest,
        crate::handlers::purchase_orders::StockCorrectionRequest,
        crate::handlers::sales_orders::CreateSalesOrderRequest,
        crate::handlers::sales_orders::ReceiveSalesOrderRequest,
        crate::handlers::settlements::PaymentRequest,
        crate::handlers::settlements::CommissionPaymentRequest,
    ))
)]
pub struct ApiDoc;

/// Swagger UI router serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
