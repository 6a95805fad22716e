use std::sync::Arc;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::discount_service::apply_discount;
use crate::domain::discount::NewDiscountUsage;
use crate::domain::errors::DomainError;
use crate::domain::invoice::Invoice;
use crate::domain::order::{
    NewOrder, NewOrderDetail, Order, OrderDetail, OrderRequest, OrderStatus, OrderTotals,
    OrderView, PricedLine, ProductSales,
};
use crate::domain::page::{Page, PageRequest};
use crate::domain::ports::{InvoiceGenerator, Store, StoreTx};

/// Prices and persists an order. The caller owns the transaction.
///
/// Unit prices are the products' current prices, copied onto the details.
pub(crate) fn place_order(
    tx: &mut dyn StoreTx,
    request: &OrderRequest,
    now: DateTime<Utc>,
) -> Result<OrderView, DomainError> {
    request.validate()?;
    let user = tx
        .find_user(request.user_id)?
        .ok_or_else(|| DomainError::not_found("User", request.user_id))?;

    let mut lines = Vec::with_capacity(request.items.len());
    for item in &request.items {
        let product = tx
            .find_product(item.product_id)?
            .ok_or_else(|| DomainError::not_found("Product", item.product_id))?;
        lines.push(PricedLine::new(product.id, item.quantity, product.price));
    }
    let totals = OrderTotals::of(&lines)?;

    let applied = match request.discount_code() {
        Some(code) => Some(apply_discount(tx, code, user.id, &totals.total_price, now)?),
        None => None,
    };
    let discount_amount = applied
        .as_ref()
        .map(|a| a.amount.clone())
        .unwrap_or_else(BigDecimal::zero);

    let order = tx.insert_order(&NewOrder {
        user_id: user.id,
        shipping_address: request.shipping_address.clone(),
        note: request.note.clone(),
        payment_method: request.payment_method,
        status: OrderStatus::Pending,
        final_price: totals.final_price(&discount_amount),
        total_price: totals.total_price,
        total_quantity: totals.total_quantity,
        discount_id: applied.as_ref().map(|a| a.discount.id),
        discount_amount,
    })?;

    if let Some(applied) = &applied {
        tx.insert_discount_usage(&NewDiscountUsage {
            user_id: user.id,
            discount_id: applied.discount.id,
            order_id: order.id,
        })?;
    }

    let new_details: Vec<NewOrderDetail> = lines
        .into_iter()
        .map(|line| NewOrderDetail {
            order_id: order.id,
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: line.unit_price,
            total_price: line.line_total,
        })
        .collect();
    let details = tx.insert_order_details(&new_details)?;

    Ok(OrderView {
        order,
        discount_code: applied.map(|a| a.discount.code),
        details,
    })
}

/// Hands a committed order to the invoice generator. Failures are logged and
/// never reach the caller.
pub(crate) fn dispatch_invoice(invoices: &dyn InvoiceGenerator, view: &OrderView) {
    if let Err(e) = invoices.generate_and_send(view) {
        log::error!(
            "Failed to generate invoice for order {}: {}",
            view.order.id,
            e
        );
    }
}

fn load_view(tx: &mut dyn StoreTx, order: Order) -> Result<OrderView, DomainError> {
    let details = tx.order_details(order.id)?;
    let discount_code = match order.discount_id {
        Some(discount_id) => tx.find_discount(discount_id)?.map(|d| d.code),
        None => None,
    };
    Ok(OrderView {
        order,
        discount_code,
        details,
    })
}

fn require_order(tx: &mut dyn StoreTx, id: Uuid) -> Result<Order, DomainError> {
    tx.find_order(id)?
        .ok_or_else(|| DomainError::not_found("Order", id))
}

pub struct OrderService<S> {
    store: S,
    invoices: Arc<dyn InvoiceGenerator>,
}

impl<S: Store> OrderService<S> {
    pub const DEFAULT_TOP_SELLING: i64 = 5;

    pub fn new(store: S, invoices: Arc<dyn InvoiceGenerator>) -> Self {
        Self { store, invoices }
    }

    /// Creates a PENDING order. The order, its discount usage and its details
    /// are written in one transaction; the invoice is produced after commit.
    pub fn create_order(&self, request: OrderRequest) -> Result<OrderView, DomainError> {
        let view = self
            .store
            .transaction(|tx| place_order(tx, &request, Utc::now()))?;
        log::info!(
            "Created order {} for user {}: total {}, discount {}, final {}",
            view.order.id,
            view.order.user_id,
            view.order.total_price,
            view.order.discount_amount,
            view.order.final_price
        );
        dispatch_invoice(self.invoices.as_ref(), &view);
        Ok(view)
    }

    pub fn get_order(&self, id: Uuid) -> Result<OrderView, DomainError> {
        self.store.transaction(|tx| {
            let order = require_order(tx, id)?;
            load_view(tx, order)
        })
    }

    pub fn orders_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        self.store.transaction(|tx| {
            if tx.find_user(user_id)?.is_none() {
                return Err(DomainError::not_found("User", user_id));
            }
            tx.orders_by_user(user_id)
        })
    }

    pub fn list_orders(&self, page: PageRequest) -> Result<Page<Order>, DomainError> {
        self.store.transaction(|tx| tx.list_orders(page))
    }

    pub fn cancel_order(&self, id: Uuid) -> Result<OrderView, DomainError> {
        let view = self.store.transaction(|tx| {
            let order = require_order(tx, id)?;
            if !order.status.is_cancellable() {
                return Err(DomainError::InvalidStateTransition(format!(
                    "order {id} is {} and cannot be cancelled",
                    order.status
                )));
            }
            tx.set_order_status(id, OrderStatus::Cancelled)?;
            let order = require_order(tx, id)?;
            load_view(tx, order)
        })?;
        log::info!("Cancelled order {}", id);
        Ok(view)
    }

    /// Overwrites the status without consulting any transition table.
    pub fn change_status(&self, id: Uuid, status: OrderStatus) -> Result<OrderView, DomainError> {
        let view = self.store.transaction(|tx| {
            if !tx.set_order_status(id, status)? {
                return Err(DomainError::not_found("Order", id));
            }
            let order = require_order(tx, id)?;
            load_view(tx, order)
        })?;
        log::info!("Order {} is now {}", id, status);
        Ok(view)
    }

    pub fn invoice_for_order(&self, order_id: Uuid) -> Result<Invoice, DomainError> {
        self.store.transaction(|tx| {
            require_order(tx, order_id)?;
            tx.find_invoice_by_order(order_id)?
                .ok_or_else(|| DomainError::not_found("Invoice", order_id))
        })
    }

    pub fn details_by_order(&self, order_id: Uuid) -> Result<Vec<OrderDetail>, DomainError> {
        self.store.transaction(|tx| {
            require_order(tx, order_id)?;
            tx.order_details(order_id)
        })
    }

    pub fn get_detail(&self, id: Uuid) -> Result<OrderDetail, DomainError> {
        self.store
            .transaction(|tx| tx.find_order_detail(id))?
            .ok_or_else(|| DomainError::not_found("OrderDetail", id))
    }

    pub fn list_details(&self, page: PageRequest) -> Result<Page<OrderDetail>, DomainError> {
        self.store.transaction(|tx| tx.list_order_details(page))
    }

    /// Products ranked by quantity sold across all orders.
    pub fn top_selling_products(&self, limit: i64) -> Result<Vec<ProductSales>, DomainError> {
        let limit = limit.clamp(1, PageRequest::MAX_LIMIT);
        self.store.transaction(|tx| tx.top_selling_products(limit))
    }
}
