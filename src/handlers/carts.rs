use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::CheckoutRequest;
use crate::domain::cart::{CartItem, CartView};
use crate::domain::order::PaymentMethod;
use crate::errors::AppError;
use crate::handlers::orders::OrderResponse;
use crate::handlers::{ListParams, PageResponse};
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCartRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    /// Zero or less removes the line.
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutBody {
    pub shipping_address: Option<String>,
    pub payment_method: PaymentMethod,
    pub note: Option<String>,
    pub discount_code: Option<String>,
}

impl From<CheckoutBody> for CheckoutRequest {
    fn from(body: CheckoutBody) -> Self {
        CheckoutRequest {
            shipping_address: body.shipping_address,
            payment_method: body.payment_method,
            note: body.note,
            discount_code: body.discount_code,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        CartItemResponse {
            line_total: item.line_total().to_string(),
            id: item.id,
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartItemResponse>,
    pub total_quantity: i32,
    pub total_price: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CartView> for CartResponse {
    fn from(view: CartView) -> Self {
        let total_quantity = view.total_quantity();
        let total_price = view.total_price().to_string();
        CartResponse {
            id: view.cart.id,
            user_id: view.cart.user_id,
            items: view.items.into_iter().map(CartItemResponse::from).collect(),
            total_quantity,
            total_price,
            created_at: view.cart.created_at.to_rfc3339(),
            updated_at: view.cart.updated_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /carts
#[utoipa::path(
    post,
    path = "/carts",
    request_body = CreateCartRequest,
    responses(
        (status = 201, description = "Cart created", body = CartResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "User already has a cart"),
    ),
    tag = "carts"
)]
pub async fn create_cart(
    state: web::Data<AppState>,
    body: web::Json<CreateCartRequest>,
) -> Result<HttpResponse, AppError> {
    let user_id = body.into_inner().user_id;
    let cart = web::block(move || state.carts.create_cart(user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CartResponse::from(cart)))
}

/// GET /carts/{id}
#[utoipa::path(
    get,
    path = "/carts/{id}",
    params(("id" = Uuid, Path, description = "Cart UUID")),
    responses(
        (status = 200, description = "Cart found", body = CartResponse),
        (status = 404, description = "Cart not found"),
    ),
    tag = "carts"
)]
pub async fn get_cart(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let cart = web::block(move || state.carts.get_cart(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// GET /carts/user/{user_id}
#[utoipa::path(
    get,
    path = "/carts/user/{user_id}",
    params(("user_id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "Cart of the user", body = CartResponse),
        (status = 404, description = "User or cart not found"),
    ),
    tag = "carts"
)]
pub async fn cart_by_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let cart = web::block(move || state.carts.cart_by_user(user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// GET /carts
#[utoipa::path(
    get,
    path = "/carts",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated list of carts", body = PageResponse<CartResponse>),
    ),
    tag = "carts"
)]
pub async fn list_carts(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let request = query.page_request();
    let page = web::block(move || state.carts.list_carts(request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PageResponse::of(page, request, CartResponse::from)))
}

/// DELETE /carts/{id}
#[utoipa::path(
    delete,
    path = "/carts/{id}",
    params(("id" = Uuid, Path, description = "Cart UUID")),
    responses(
        (status = 204, description = "Cart deleted"),
        (status = 404, description = "Cart not found"),
    ),
    tag = "carts"
)]
pub async fn delete_cart(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || state.carts.delete_cart(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /carts/{id}/items
///
/// Adding a product already in the cart increases that line's quantity.
#[utoipa::path(
    post,
    path = "/carts/{id}/items",
    params(("id" = Uuid, Path, description = "Cart UUID")),
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Item added", body = CartResponse),
        (status = 400, description = "Quantity must be positive"),
        (status = 404, description = "Cart or product not found"),
    ),
    tag = "carts"
)]
pub async fn add_item(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<AddCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let cart_id = path.into_inner();
    let body = body.into_inner();
    let cart = web::block(move || state.carts.add_item(cart_id, body.product_id, body.quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// PATCH /carts/items/{item_id}
#[utoipa::path(
    patch,
    path = "/carts/items/{item_id}",
    params(("item_id" = Uuid, Path, description = "Cart item UUID")),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Quantity updated", body = CartResponse),
        (status = 404, description = "Cart item not found"),
    ),
    tag = "carts"
)]
pub async fn update_item(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    let quantity = body.into_inner().quantity;
    let cart = web::block(move || state.carts.update_item_quantity(item_id, quantity))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// DELETE /carts/items/{item_id}
#[utoipa::path(
    delete,
    path = "/carts/items/{item_id}",
    params(("item_id" = Uuid, Path, description = "Cart item UUID")),
    responses(
        (status = 200, description = "Item removed", body = CartResponse),
        (status = 404, description = "Cart item not found"),
    ),
    tag = "carts"
)]
pub async fn remove_item(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    let cart = web::block(move || state.carts.remove_item(item_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// DELETE /carts/user/{user_id}/items
#[utoipa::path(
    delete,
    path = "/carts/user/{user_id}/items",
    params(("user_id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 200, description = "Cart emptied", body = CartResponse),
        (status = 404, description = "User or cart not found"),
    ),
    tag = "carts"
)]
pub async fn clear_cart(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let cart = web::block(move || state.carts.clear_cart(user_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CartResponse::from(cart)))
}

/// POST /carts/user/{user_id}/checkout
///
/// Places an order for everything in the user's cart and empties the cart in
/// the same transaction.
#[utoipa::path(
    post,
    path = "/carts/user/{user_id}/checkout",
    params(("user_id" = Uuid, Path, description = "User UUID")),
    request_body = CheckoutBody,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Cart is empty"),
        (status = 404, description = "User, cart or discount code not found"),
        (status = 422, description = "Discount code cannot be applied"),
    ),
    tag = "carts"
)]
pub async fn checkout(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CheckoutBody>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    let request = CheckoutRequest::from(body.into_inner());
    let order = web::block(move || state.carts.checkout(user_id, request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}
