use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::catalog::{Category, CategoryInput, CategoryNode, CategoryStatus};
use crate::errors::AppError;
use crate::handlers::{ListParams, PageResponse};
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub name: String,
    pub parent_id: Option<Uuid>,
    /// Defaults to ACTIVE.
    pub status: Option<CategoryStatus>,
    #[serde(default)]
    pub is_hot: bool,
    #[serde(default)]
    pub is_new: bool,
}

impl From<CategoryRequest> for CategoryInput {
    fn from(body: CategoryRequest) -> Self {
        CategoryInput {
            name: body.name,
            parent_id: body.parent_id,
            status: body.status.unwrap_or(CategoryStatus::Active),
            is_hot: body.is_hot,
            is_new: body.is_new,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub status: CategoryStatus,
    pub is_hot: bool,
    pub is_new: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        CategoryResponse {
            id: category.id,
            name: category.name,
            parent_id: category.parent_id,
            status: category.status,
            is_hot: category.is_hot,
            is_new: category.is_new,
            created_at: category.created_at.to_rfc3339(),
            updated_at: category.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryNodeResponse {
    pub id: Uuid,
    pub name: String,
    pub status: CategoryStatus,
    #[schema(no_recursion)]
    pub children: Vec<CategoryNodeResponse>,
}

impl From<CategoryNode> for CategoryNodeResponse {
    fn from(node: CategoryNode) -> Self {
        CategoryNodeResponse {
            id: node.id,
            name: node.name,
            status: node.status,
            children: node.children.into_iter().map(Self::from).collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /categories
#[utoipa::path(
    post,
    path = "/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid category data"),
        (status = 404, description = "Parent category not found"),
        (status = 409, description = "Category name already taken"),
    ),
    tag = "categories"
)]
pub async fn create_category(
    state: web::Data<AppState>,
    body: web::Json<CategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let input = CategoryInput::from(body.into_inner());
    let category = web::block(move || state.categories.create_category(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CategoryResponse::from(category)))
}

/// GET /categories/tree
///
/// Every category nested under its parent; roots and siblings sorted by name.
#[utoipa::path(
    get,
    path = "/categories/tree",
    responses(
        (status = 200, description = "Category tree", body = Vec<CategoryNodeResponse>),
    ),
    tag = "categories"
)]
pub async fn category_tree(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let roots = web::block(move || state.categories.category_tree())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<CategoryNodeResponse> =
        roots.into_iter().map(CategoryNodeResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /categories/{id}
#[utoipa::path(
    get,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 404, description = "Category not found"),
    ),
    tag = "categories"
)]
pub async fn get_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let category = web::block(move || state.categories.get_category(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

/// PUT /categories/{id}
///
/// Moving a category under itself or one of its descendants is rejected with
/// 409.
#[utoipa::path(
    put,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, description = "Invalid category data"),
        (status = 404, description = "Category or parent not found"),
        (status = 409, description = "Name taken or parent would create a cycle"),
    ),
    tag = "categories"
)]
pub async fn update_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CategoryRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = CategoryInput::from(body.into_inner());
    let category = web::block(move || state.categories.update_category(id, input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CategoryResponse::from(category)))
}

/// DELETE /categories/{id}
///
/// Removes the category and its descendants. Refused while any of them still
/// holds products.
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(("id" = Uuid, Path, description = "Category UUID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category subtree still holds products"),
    ),
    tag = "categories"
)]
pub async fn delete_category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || state.categories.delete_category(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}

/// GET /categories
#[utoipa::path(
    get,
    path = "/categories",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated list of categories", body = PageResponse<CategoryResponse>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let request = query.page_request();
    let page = web::block(move || state.categories.list_categories(request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(PageResponse::of(page, request, CategoryResponse::from)))
}
