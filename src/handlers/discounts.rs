use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::discount::{Discount, DiscountInput, DiscountStatus, DiscountType};
use crate::errors::AppError;
use crate::handlers::{parse_money, parse_optional_money, ListParams, PageResponse};
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct DiscountRequest {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    /// Fixed amount, or a percentage between 0 and 100, as a decimal string.
    pub value: String,
    pub min_order_amount: Option<String>,
    /// Remaining uses across all customers; omit for unlimited.
    pub max_uses: Option<i32>,
    pub max_uses_per_user: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl DiscountRequest {
    fn into_input(self) -> Result<DiscountInput, AppError> {
        Ok(DiscountInput {
            value: parse_money("value", &self.value)?,
            min_order_amount: parse_optional_money(
                "min_order_amount",
                self.min_order_amount.as_deref(),
            )?,
            code: self.code,
            description: self.description,
            discount_type: self.discount_type,
            max_uses: self.max_uses,
            max_uses_per_user: self.max_uses_per_user,
            start_date: self.start_date,
            end_date: self.end_date,
            active: self.active,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DiscountResponse {
    pub id: Uuid,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub value: String,
    pub min_order_amount: Option<String>,
    pub max_uses: Option<i32>,
    pub max_uses_per_user: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub active: bool,
    /// Derived from the active flag and the validity window at response time.
    pub status: DiscountStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Discount> for DiscountResponse {
    fn from(discount: Discount) -> Self {
        DiscountResponse {
            status: discount.status_at(Utc::now()),
            id: discount.id,
            code: discount.code,
            description: discount.description,
            discount_type: discount.discount_type,
            value: discount.value.to_string(),
            min_order_amount: discount.min_order_amount.map(|m| m.to_string()),
            max_uses: discount.max_uses,
            max_uses_per_user: discount.max_uses_per_user,
            start_date: discount.start_date.map(|d| d.to_rfc3339()),
            end_date: discount.end_date.map(|d| d.to_rfc3339()),
            active: discount.active,
            created_at: discount.created_at.to_rfc3339(),
            updated_at: discount.updated_at.to_rfc3339(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /discounts
#[utoipa::path(
    post,
    path = "/discounts",
    request_body = DiscountRequest,
    responses(
        (status = 201, description = "Discount created", body = DiscountResponse),
        (status = 400, description = "Invalid discount data"),
        (status = 409, description = "Code already in use"),
    ),
    tag = "discounts"
)]
pub async fn create_discount(
    state: web::Data<AppState>,
    body: web::Json<DiscountRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;
    let discount = web::block(move || state.discounts.create_discount(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(DiscountResponse::from(discount)))
}

/// GET /discounts/code/{code}
///
/// Looks a code up case-insensitively and checks that it is currently usable.
#[utoipa::path(
    get,
    path = "/discounts/code/{code}",
    params(("code" = String, Path, description = "Discount code")),
    responses(
        (status = 200, description = "Code is currently valid", body = DiscountResponse),
        (status = 404, description = "Unknown code"),
        (status = 422, description = "Code is inactive, not yet valid or expired"),
    ),
    tag = "discounts"
)]
pub async fn get_discount_by_code(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner();
    let discount = web::block(move || state.discounts.get_valid_by_code(&code))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(DiscountResponse::from(discount)))
}

/// GET /discounts/{id}
#[utoipa::path(
    get,
    path = "/discounts/{id}",
    params(("id" = Uuid, Path, description = "Discount UUID")),
    responses(
        (status = 200, description = "Discount found", body = DiscountResponse),
        (status = 404, description = "Discount not found"),
    ),
    tag = "discounts"
)]
pub async fn get_discount(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let discount = web::block(move || state.discounts.get_discount(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(DiscountResponse::from(discount)))
}

/// PUT /discounts/{id}
#[utoipa::path(
    put,
    path = "/discounts/{id}",
    params(("id" = Uuid, Path, description = "Discount UUID")),
    request_body = DiscountRequest,
    responses(
        (status = 200, description = "Discount updated", body = DiscountResponse),
        (status = 400, description = "Invalid discount data"),
        (status = 404, description = "Discount not found"),
        (status = 409, description = "Code already in use"),
    ),
    tag = "discounts"
)]
pub async fn update_discount(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<DiscountRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = body.into_inner().into_input()?;
    let discount = web::block(move || state.discounts.update_discount(id, input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(DiscountResponse::from(discount)))
}

/// DELETE /discounts/{id}
#[utoipa::path(
    delete,
    path = "/discounts/{id}",
    params(("id" = Uuid, Path, description = "Discount UUID")),
    responses(
        (status = 204, description = "Discount deleted"),
        (status = 404, description = "Discount not found"),
    ),
    tag = "discounts"
)]
pub async fn delete_discount(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || state.discounts.delete_discount(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /discounts
#[utoipa::path(
    get,
    path = "/discounts",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated list of discounts", body = PageResponse<DiscountResponse>),
    ),
    tag = "discounts"
)]
pub async fn list_discounts(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let request = query.page_request();
    let page = web::block(move || state.discounts.list_discounts(request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PageResponse::of(page, request, DiscountResponse::from)))
}
