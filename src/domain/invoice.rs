use std::fmt::Write as _;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::order::{OrderView, PaymentMethod};
use super::user::User;

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub id: Uuid,
    pub order_id: Uuid,
    pub invoice_code: String,
    pub amount: BigDecimal,
    pub payment_method: PaymentMethod,
    pub is_paid: bool,
    pub document: String,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub order_id: Uuid,
    pub invoice_code: String,
    pub amount: BigDecimal,
    pub payment_method: PaymentMethod,
    pub document: String,
}

pub fn invoice_code(order_id: Uuid) -> String {
    format!("INV_{order_id}")
}

/// Plain-text invoice for `view`, addressed to `customer`.
pub fn render_invoice(view: &OrderView, customer: &User) -> String {
    let order = &view.order;
    let mut doc = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(doc, "INVOICE {}", invoice_code(order.id));
    let _ = writeln!(doc, "Order: {}", order.id);
    let _ = writeln!(doc, "Customer: {} <{}>", customer.display_name(), customer.email);
    let _ = writeln!(doc, "Date: {}", order.created_at.format("%Y-%m-%d %H:%M UTC"));
    if let Some(address) = &order.shipping_address {
        let _ = writeln!(doc, "Ship to: {address}");
    }
    let _ = writeln!(doc, "Payment: {}", order.payment_method);
    let _ = writeln!(doc, "Status: {}", order.status);
    if let Some(note) = &order.note {
        let _ = writeln!(doc, "Note: {note}");
    }
    let _ = writeln!(doc);
    for detail in &view.details {
        let _ = writeln!(
            doc,
            "- {} x{} @ {} = {}",
            detail.product_name, detail.quantity, detail.unit_price, detail.total_price
        );
    }
    let _ = writeln!(doc);
    let _ = writeln!(doc, "Items: {}", order.total_quantity);
    let _ = writeln!(doc, "Subtotal: {}", order.total_price);
    if let Some(code) = &view.discount_code {
        let _ = writeln!(doc, "Discount ({code}): -{}", order.discount_amount);
    }
    let _ = writeln!(doc, "Total due: {}", order.final_price);
    doc
}
