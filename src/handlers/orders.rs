use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::invoice::Invoice;
use crate::domain::order::{LineItem, Order, OrderRequest, OrderStatus, OrderView, PaymentMethod};
use crate::errors::AppError;
use crate::handlers::order_details::OrderDetailResponse;
use crate::handlers::{ListParams, PageResponse};
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub user_id: Uuid,
    pub shipping_address: Option<String>,
    pub payment_method: PaymentMethod,
    pub note: Option<String>,
    /// Optional, matched case-insensitively. A blank code is ignored.
    pub discount_code: Option<String>,
    pub items: Vec<OrderItemRequest>,
}

impl From<CreateOrderRequest> for OrderRequest {
    fn from(body: CreateOrderRequest) -> Self {
        OrderRequest {
            user_id: body.user_id,
            shipping_address: body.shipping_address,
            payment_method: body.payment_method,
            note: body.note,
            discount_code: body.discount_code,
            items: body
                .items
                .into_iter()
                .map(|i| LineItem {
                    product_id: i.product_id,
                    quantity: i.quantity,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shipping_address: Option<String>,
    pub note: Option<String>,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub total_price: String,
    pub total_quantity: i32,
    pub discount_id: Option<Uuid>,
    pub discount_code: Option<String>,
    pub discount_amount: String,
    pub final_price: String,
    pub created_at: String,
    pub updated_at: String,
    pub details: Vec<OrderDetailResponse>,
}

impl OrderResponse {
    fn summary(order: Order) -> Self {
        OrderResponse {
            id: order.id,
            user_id: order.user_id,
            shipping_address: order.shipping_address,
            note: order.note,
            payment_method: order.payment_method,
            status: order.status,
            total_price: order.total_price.to_string(),
            total_quantity: order.total_quantity,
            discount_id: order.discount_id,
            discount_code: None,
            discount_amount: order.discount_amount.to_string(),
            final_price: order.final_price.to_string(),
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
            details: vec![],
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        OrderResponse {
            discount_code: view.discount_code,
            details: view
                .details
                .into_iter()
                .map(OrderDetailResponse::from)
                .collect(),
            ..OrderResponse::summary(view.order)
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub invoice_code: String,
    pub amount: String,
    pub payment_method: PaymentMethod,
    pub is_paid: bool,
    pub document: String,
    pub issued_at: String,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        InvoiceResponse {
            id: invoice.id,
            order_id: invoice.order_id,
            invoice_code: invoice.invoice_code,
            amount: invoice.amount.to_string(),
            payment_method: invoice.payment_method,
            is_paid: invoice.is_paid,
            document: invoice.document,
            issued_at: invoice.issued_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Prices the lines at current product prices, applies the optional discount
/// code and stores the order, its lines and the discount usage in a single
/// transaction. The invoice is generated once the order is committed.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderResponse),
        (status = 400, description = "Invalid order lines"),
        (status = 404, description = "User, product or discount code not found"),
        (status = 422, description = "Discount code cannot be applied"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let request = OrderRequest::from(body.into_inner());
    let view = web::block(move || state.orders.create_order(request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(view)))
}

/// GET /orders/{id}
///
/// Returns the order together with its order lines.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let view = web::block(move || state.orders.get_order(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(view)))
}

/// GET /orders/user/{user_id}
///
/// The user's orders, newest first, without their lines.
#[utoipa::path(
    get,
    path = "/orders/user/{user_id}",
    params(("user_id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "Orders of the user", body = Vec<OrderResponse>),
        (status = 404, description = "User not found"),
    ),
    tag = "orders"
)]
pub async fn orders_by_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let orders = web::block(move || state.orders.orders_by_user(user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::summary).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders
///
/// Returns a paginated list of orders (without their lines), newest first.
#[utoipa::path(
    get,
    path = "/orders",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated list of orders", body = PageResponse<OrderResponse>),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let request = query.page_request();
    let page = web::block(move || state.orders.list_orders(request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PageResponse::of(page, request, OrderResponse::summary)))
}

/// PATCH /orders/{id}/cancel
///
/// CANCELLED and DELIVERED orders can no longer be cancelled.
#[utoipa::path(
    patch,
    path = "/orders/{id}/cancel",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order cancelled", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order can no longer be cancelled"),
    ),
    tag = "orders"
)]
pub async fn cancel_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let view = web::block(move || state.orders.cancel_order(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(view)))
}

/// PATCH /orders/{id}/status
#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = OrderStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn change_order_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<OrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status = body.into_inner().status;
    let view = web::block(move || state.orders.change_status(id, status))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(view)))
}

/// GET /orders/{id}/invoice
#[utoipa::path(
    get,
    path = "/orders/{id}/invoice",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Invoice of the order", body = InvoiceResponse),
        (status = 404, description = "Order has no invoice"),
    ),
    tag = "orders"
)]
pub async fn get_invoice(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let invoice = web::block(move || state.orders.invoice_for_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(InvoiceResponse::from(invoice)))
}
