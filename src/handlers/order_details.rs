use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::OrderService;
use crate::domain::order::{OrderDetail, ProductSales};
use crate::errors::AppError;
use crate::handlers::{ListParams, PageResponse};
use crate::infrastructure::ShopStore;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetailResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    /// Price of one unit when the order was placed.
    pub unit_price: String,
    pub total_price: String,
}

impl From<OrderDetail> for OrderDetailResponse {
    fn from(detail: OrderDetail) -> Self {
        OrderDetailResponse {
            id: detail.id,
            order_id: detail.order_id,
            product_id: detail.product_id,
            product_name: detail.product_name,
            quantity: detail.quantity,
            unit_price: detail.unit_price.to_string(),
            total_price: detail.total_price.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductSalesResponse {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity_sold: i64,
    pub revenue: String,
}

impl From<ProductSales> for ProductSalesResponse {
    fn from(sales: ProductSales) -> Self {
        ProductSalesResponse {
            product_id: sales.product_id,
            product_name: sales.product_name,
            quantity_sold: sales.quantity_sold,
            revenue: sales.revenue.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopSellingParams {
    /// Number of products to return. Defaults to 5, maximum 100.
    pub limit: Option<i64>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /order-details
#[utoipa::path(
    get,
    path = "/order-details",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated list of order lines", body = PageResponse<OrderDetailResponse>),
    ),
    tag = "order-details"
)]
pub async fn list_details(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let request = query.page_request();
    let page = web::block(move || state.orders.list_details(request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PageResponse::of(page, request, OrderDetailResponse::from)))
}

/// GET /order-details/top-selling
///
/// Products ranked by units sold over every order line.
#[utoipa::path(
    get,
    path = "/order-details/top-selling",
    params(TopSellingParams),
    responses(
        (status = 200, description = "Best selling products", body = Vec<ProductSalesResponse>),
    ),
    tag = "order-details"
)]
pub async fn top_selling(
    state: web::Data<AppState>,
    query: web::Query<TopSellingParams>,
) -> Result<HttpResponse, AppError> {
    let limit = query
        .limit
        .unwrap_or(OrderService::<ShopStore>::DEFAULT_TOP_SELLING);
    let ranking = web::block(move || state.orders.top_selling_products(limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<ProductSalesResponse> =
        ranking.into_iter().map(ProductSalesResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /order-details/order/{order_id}
#[utoipa::path(
    get,
    path = "/order-details/order/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Lines of the order", body = Vec<OrderDetailResponse>),
        (status = 404, description = "Order not found"),
    ),
    tag = "order-details"
)]
pub async fn details_by_order(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let details = web::block(move || state.orders.details_by_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderDetailResponse> =
        details.into_iter().map(OrderDetailResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /order-details/{id}
#[utoipa::path(
    get,
    path = "/order-details/{id}",
    params(("id" = Uuid, Path, description = "Order line UUID")),
    responses(
        (status = 200, description = "Order line found", body = OrderDetailResponse),
        (status = 404, description = "Order line not found"),
    ),
    tag = "order-details"
)]
pub async fn get_detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let detail = web::block(move || state.orders.get_detail(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderDetailResponse::from(detail)))
}
