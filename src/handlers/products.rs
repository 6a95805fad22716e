use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::catalog::{Product, ProductInput, ProductStatus, ProductTag};
use crate::errors::AppError;
use crate::handlers::{parse_money, parse_optional_money, ListParams, PageResponse};
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub price: String,
    pub sale_price: Option<String>,
    #[serde(default)]
    pub stock_quantity: i32,
    pub sku: Option<String>,
    pub thumbnail: Option<String>,
    /// Defaults to ACTIVE.
    pub status: Option<ProductStatus>,
    /// Defaults to NORMAL.
    pub tag: Option<ProductTag>,
    pub category_id: Uuid,
    /// On update an empty list keeps the current images.
    #[serde(default)]
    pub image_urls: Vec<String>,
}

impl ProductRequest {
    fn into_input(self) -> Result<ProductInput, AppError> {
        Ok(ProductInput {
            price: parse_money("price", &self.price)?,
            sale_price: parse_optional_money("sale_price", self.sale_price.as_deref())?,
            name: self.name,
            slug: self.slug,
            description: self.description,
            short_description: self.short_description,
            stock_quantity: self.stock_quantity,
            sku: self.sku,
            thumbnail: self.thumbnail,
            status: self.status.unwrap_or(ProductStatus::Active),
            tag: self.tag.unwrap_or(ProductTag::Normal),
            category_id: self.category_id,
            image_urls: self.image_urls,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price: String,
    pub sale_price: Option<String>,
    pub stock_quantity: i32,
    pub sku: Option<String>,
    pub thumbnail: Option<String>,
    pub status: ProductStatus,
    pub tag: ProductTag,
    pub category_id: Uuid,
    pub image_urls: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            id: product.id,
            name: product.name,
            slug: product.slug,
            description: product.description,
            short_description: product.short_description,
            price: product.price.to_string(),
            sale_price: product.sale_price.map(|p| p.to_string()),
            stock_quantity: product.stock_quantity,
            sku: product.sku,
            thumbnail: product.thumbnail,
            status: product.status,
            tag: product.tag,
            category_id: product.category_id,
            image_urls: product.image_urls,
            created_at: product.created_at.to_rfc3339(),
            updated_at: product.updated_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid product data"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Name or SKU already taken"),
    ),
    tag = "products"
)]
pub async fn create_product(
    state: web::Data<AppState>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;
    let product = web::block(move || state.products.create_product(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = web::block(move || state.products.get_product(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// PUT /products/{id}
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid product data"),
        (status = 404, description = "Product or category not found"),
        (status = 409, description = "Name or SKU already taken"),
    ),
    tag = "products"
)]
pub async fn update_product(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = body.into_inner().into_input()?;
    let product = web::block(move || state.products.update_product(id, input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// DELETE /products/{id}
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = Uuid, Path, description = "Product UUID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product appears on orders"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || state.products.delete_product(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated list of products", body = PageResponse<ProductResponse>),
    ),
    tag = "products"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let request = query.page_request();
    let page = web::block(move || state.products.list_products(request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PageResponse::of(page, request, ProductResponse::from)))
}
