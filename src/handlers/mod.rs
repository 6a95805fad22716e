pub mod carts;
pub mod categories;
pub mod discounts;
pub mod order_details;
pub mod orders;
pub mod products;
pub mod users;

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::page::{Page, PageRequest};
use crate::errors::AppError;

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    PageRequest::DEFAULT_LIMIT
}

impl ListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> PageResponse<T> {
    pub fn of<U>(page: Page<U>, request: PageRequest, f: impl FnMut(U) -> T) -> Self {
        let page = page.map(f);
        Self {
            items: page.items,
            total: page.total,
            page: request.page,
            limit: request.limit,
        }
    }
}

// ── Money ────────────────────────────────────────────────────────────────────

/// Parses a decimal amount sent as a string, e.g. "9.99".
pub(crate) fn parse_money(field: &str, value: &str) -> Result<BigDecimal, AppError> {
    BigDecimal::from_str(value.trim())
        .map_err(|e| AppError::BadRequest(format!("Invalid {} '{}': {}", field, value, e)))
}

pub(crate) fn parse_optional_money(
    field: &str,
    value: Option<&str>,
) -> Result<Option<BigDecimal>, AppError> {
    value.map(|v| parse_money(field, v)).transpose()
}
