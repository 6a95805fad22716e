use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::errors::{ensure, DomainError};

string_enum! {
    pub enum DiscountType {
        Fixed => "FIXED",
        Percentage => "PERCENTAGE",
    }
}

string_enum! {
    /// Reported state of a discount at a point in time; never stored.
    pub enum DiscountStatus {
        Upcoming => "UPCOMING",
        Active => "ACTIVE",
        Expired => "EXPIRED",
        Inactive => "INACTIVE",
    }
}

/// Why a discount code cannot be applied to an order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscountRejection {
    #[error("discount code '{0}' does not exist")]
    NotFound(String),
    #[error("discount is inactive")]
    Inactive,
    #[error("discount is not valid yet")]
    NotYetValid,
    #[error("discount has expired")]
    Expired,
    #[error("discount has been fully used")]
    Exhausted,
    #[error("discount already used the maximum of {0} times by this user")]
    PerUserLimitExceeded(i32),
    #[error("order total does not reach the discount minimum of {0}")]
    BelowMinimum(BigDecimal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Discount {
    pub id: Uuid,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub value: BigDecimal,
    pub min_order_amount: Option<BigDecimal>,
    /// Remaining uses across all users; `None` is unlimited.
    pub max_uses: Option<i32>,
    pub max_uses_per_user: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Discount {
    pub fn status_at(&self, now: DateTime<Utc>) -> DiscountStatus {
        match self.check_window(now) {
            Ok(()) => DiscountStatus::Active,
            Err(DiscountRejection::NotYetValid) => DiscountStatus::Upcoming,
            Err(DiscountRejection::Expired) => DiscountStatus::Expired,
            Err(_) => DiscountStatus::Inactive,
        }
    }

    /// Active flag, then the validity window.
    pub fn check_window(&self, now: DateTime<Utc>) -> Result<(), DiscountRejection> {
        if !self.active {
            return Err(DiscountRejection::Inactive);
        }
        if self.start_date.is_some_and(|start| now < start) {
            return Err(DiscountRejection::NotYetValid);
        }
        if self.end_date.is_some_and(|end| now > end) {
            return Err(DiscountRejection::Expired);
        }
        Ok(())
    }

    /// Runs every applicability check in order and returns the amount to take
    /// off `order_total`. The first failing check wins.
    pub fn evaluate(
        &self,
        now: DateTime<Utc>,
        prior_uses_by_user: i64,
        order_total: &BigDecimal,
    ) -> Result<BigDecimal, DiscountRejection> {
        self.check_window(now)?;

        if self.max_uses.is_some_and(|remaining| remaining <= 0) {
            return Err(DiscountRejection::Exhausted);
        }

        if let Some(limit) = self.max_uses_per_user {
            if prior_uses_by_user >= i64::from(limit) {
                return Err(DiscountRejection::PerUserLimitExceeded(limit));
            }
        }

        if let Some(minimum) = &self.min_order_amount {
            if order_total < minimum {
                return Err(DiscountRejection::BelowMinimum(minimum.clone()));
            }
        }

        Ok(self.amount_for(order_total))
    }

    /// Discount amount for `order_total`, never more than the total itself.
    /// Rounded to cents, the scale of the stored money columns.
    pub fn amount_for(&self, order_total: &BigDecimal) -> BigDecimal {
        let raw = match self.discount_type {
            DiscountType::Percentage => order_total * &self.value / BigDecimal::from(100),
            DiscountType::Fixed => self.value.clone(),
        };
        let amount = if &raw > order_total {
            order_total.clone()
        } else {
            raw
        };
        amount.round(2)
    }
}

#[derive(Debug, Clone)]
pub struct DiscountInput {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub value: BigDecimal,
    pub min_order_amount: Option<BigDecimal>,
    pub max_uses: Option<i32>,
    pub max_uses_per_user: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub active: bool,
}

impl DiscountInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        let code = self.code.trim();
        ensure(!code.is_empty(), || "discount code must not be blank".to_string())?;
        ensure(code.len() <= 50, || {
            "discount code must be at most 50 characters".to_string()
        })?;
        ensure(self.value > BigDecimal::zero(), || {
            format!("discount value must be greater than zero, got {}", self.value)
        })?;
        if self.discount_type == DiscountType::Percentage {
            ensure(self.value <= BigDecimal::from(100), || {
                format!("percentage discount cannot exceed 100, got {}", self.value)
            })?;
        }
        if let Some(minimum) = &self.min_order_amount {
            ensure(*minimum >= BigDecimal::zero(), || {
                format!("minimum order amount must not be negative, got {minimum}")
            })?;
        }
        ensure(self.max_uses.map_or(true, |n| n >= 0), || {
            "max uses must not be negative".to_string()
        })?;
        ensure(self.max_uses_per_user.map_or(true, |n| n >= 0), || {
            "max uses per user must not be negative".to_string()
        })?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            ensure(start <= end, || {
                format!("start date {start} is after end date {end}")
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscountUsage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub discount_id: Uuid,
    pub order_id: Uuid,
    pub used_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDiscountUsage {
    pub user_id: Uuid,
    pub discount_id: Uuid,
    pub order_id: Uuid,
}
