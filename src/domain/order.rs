use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::{ensure, DomainError};

string_enum! {
    pub enum OrderStatus {
        Pending => "PENDING",
        Confirmed => "CONFIRMED",
        Processing => "PROCESSING",
        Shipped => "SHIPPED",
        Delivered => "DELIVERED",
        Cancelled => "CANCELLED",
    }
}

impl OrderStatus {
    /// Cancelled and delivered orders can no longer be cancelled.
    pub fn is_cancellable(self) -> bool {
        !matches!(self, OrderStatus::Cancelled | OrderStatus::Delivered)
    }
}

string_enum! {
    pub enum PaymentMethod {
        Cod => "COD",
        BankTransfer => "BANK_TRANSFER",
        CreditCard => "CREDIT_CARD",
        EWallet => "E_WALLET",
    }
}

/// A requested (product, quantity) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub user_id: Uuid,
    pub shipping_address: Option<String>,
    pub payment_method: PaymentMethod,
    pub note: Option<String>,
    pub discount_code: Option<String>,
    pub items: Vec<LineItem>,
}

impl OrderRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        ensure(!self.items.is_empty(), || {
            "an order needs at least one line item".to_string()
        })?;
        for item in &self.items {
            ensure(item.quantity > 0, || {
                format!(
                    "quantity for product {} must be positive, got {}",
                    item.product_id, item.quantity
                )
            })?;
        }
        if let Some(address) = &self.shipping_address {
            ensure(address.len() <= 255, || {
                "shipping address must be at most 255 characters".to_string()
            })?;
        }
        Ok(())
    }

    /// The discount code to apply, if one was supplied and is not blank.
    pub fn discount_code(&self) -> Option<&str> {
        self.discount_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

/// A line item resolved against the catalog, priced at order time.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub line_total: BigDecimal,
}

impl PricedLine {
    pub fn new(product_id: Uuid, quantity: i32, unit_price: BigDecimal) -> Self {
        let line_total = &unit_price * BigDecimal::from(quantity);
        Self {
            product_id,
            quantity,
            unit_price,
            line_total,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    pub total_price: BigDecimal,
    pub total_quantity: i32,
}

impl OrderTotals {
    pub fn of(lines: &[PricedLine]) -> Result<Self, DomainError> {
        lines.iter().try_fold(
            OrderTotals {
                total_price: BigDecimal::zero(),
                total_quantity: 0,
            },
            |acc, line| {
                let total_quantity = acc.total_quantity.checked_add(line.quantity).ok_or_else(|| {
                    DomainError::InvalidInput("total order quantity is too large".to_string())
                })?;
                Ok(OrderTotals {
                    total_price: acc.total_price + &line.line_total,
                    total_quantity,
                })
            },
        )
    }

    /// Total minus the discount, floored at zero.
    pub fn final_price(&self, discount_amount: &BigDecimal) -> BigDecimal {
        let remaining = &self.total_price - discount_amount;
        if remaining < BigDecimal::zero() {
            BigDecimal::zero()
        } else {
            remaining
        }
    }
}

/// Order header as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shipping_address: Option<String>,
    pub note: Option<String>,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub total_price: BigDecimal,
    pub total_quantity: i32,
    pub discount_id: Option<Uuid>,
    pub discount_amount: BigDecimal,
    pub final_price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub shipping_address: Option<String>,
    pub note: Option<String>,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub total_price: BigDecimal,
    pub total_quantity: i32,
    pub discount_id: Option<Uuid>,
    pub discount_amount: BigDecimal,
    pub final_price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetail {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub total_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewOrderDetail {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub total_price: BigDecimal,
}

/// Header, line items and the code of the applied discount.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub order: Order,
    pub discount_code: Option<String>,
    pub details: Vec<OrderDetail>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity_sold: i64,
    pub revenue: BigDecimal,
}
