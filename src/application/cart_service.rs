use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::order_service::{dispatch_invoice, place_order};
use crate::domain::cart::{Cart, CartView, NewCartItem};
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderRequest, OrderView, PaymentMethod};
use crate::domain::page::{Page, PageRequest};
use crate::domain::ports::{InvoiceGenerator, Store, StoreTx};

/// Order fields a checkout takes on top of the cart's lines.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub shipping_address: Option<String>,
    pub payment_method: PaymentMethod,
    pub note: Option<String>,
    pub discount_code: Option<String>,
}

fn view_of(tx: &mut dyn StoreTx, cart: Cart) -> Result<CartView, DomainError> {
    let items = tx.cart_items(cart.id)?;
    Ok(CartView { cart, items })
}

fn require_cart(tx: &mut dyn StoreTx, id: Uuid) -> Result<Cart, DomainError> {
    tx.find_cart(id)?
        .ok_or_else(|| DomainError::not_found("Cart", id))
}

fn require_user_cart(tx: &mut dyn StoreTx, user_id: Uuid) -> Result<Cart, DomainError> {
    if tx.find_user(user_id)?.is_none() {
        return Err(DomainError::not_found("User", user_id));
    }
    tx.find_cart_by_user(user_id)?
        .ok_or_else(|| DomainError::not_found("Cart", user_id))
}

pub struct CartService<S> {
    store: S,
    invoices: Arc<dyn InvoiceGenerator>,
}

impl<S: Store> CartService<S> {
    pub fn new(store: S, invoices: Arc<dyn InvoiceGenerator>) -> Self {
        Self { store, invoices }
    }

    pub fn create_cart(&self, user_id: Uuid) -> Result<CartView, DomainError> {
        let view = self.store.transaction(|tx| {
            if tx.find_user(user_id)?.is_none() {
                return Err(DomainError::not_found("User", user_id));
            }
            if tx.find_cart_by_user(user_id)?.is_some() {
                return Err(DomainError::Conflict(format!(
                    "user {user_id} already has a cart"
                )));
            }
            let cart = tx.insert_cart(user_id)?;
            Ok(CartView {
                cart,
                items: Vec::new(),
            })
        })?;
        log::info!("Created cart {} for user {}", view.cart.id, user_id);
        Ok(view)
    }

    pub fn get_cart(&self, id: Uuid) -> Result<CartView, DomainError> {
        self.store.transaction(|tx| {
            let cart = require_cart(tx, id)?;
            view_of(tx, cart)
        })
    }

    pub fn cart_by_user(&self, user_id: Uuid) -> Result<CartView, DomainError> {
        self.store.transaction(|tx| {
            let cart = require_user_cart(tx, user_id)?;
            view_of(tx, cart)
        })
    }

    pub fn list_carts(&self, page: PageRequest) -> Result<Page<CartView>, DomainError> {
        self.store.transaction(|tx| {
            let carts = tx.list_carts(page)?;
            let mut views = Vec::with_capacity(carts.items.len());
            for cart in carts.items {
                views.push(view_of(tx, cart)?);
            }
            Ok(Page {
                items: views,
                total: carts.total,
            })
        })
    }

    pub fn delete_cart(&self, id: Uuid) -> Result<(), DomainError> {
        self.store.transaction(|tx| {
            if tx.delete_cart(id)? {
                Ok(())
            } else {
                Err(DomainError::not_found("Cart", id))
            }
        })?;
        log::info!("Deleted cart {}", id);
        Ok(())
    }

    /// Adds `quantity` of a product. A product already in the cart keeps its
    /// line and first captured price; only the quantity grows.
    pub fn add_item(&self, cart_id: Uuid, product_id: Uuid, quantity: i32) -> Result<CartView, DomainError> {
        if quantity <= 0 {
            return Err(DomainError::InvalidInput(format!(
                "quantity must be positive, got {quantity}"
            )));
        }
        self.store.transaction(|tx| {
            let cart = require_cart(tx, cart_id)?;
            let product = tx
                .find_product(product_id)?
                .ok_or_else(|| DomainError::not_found("Product", product_id))?;
            let existing = tx
                .cart_items(cart.id)?
                .into_iter()
                .find(|item| item.product_id == product.id);
            match existing {
                Some(item) => {
                    let merged = item.quantity.checked_add(quantity).ok_or_else(|| {
                        DomainError::InvalidInput(format!("quantity overflow for product {product_id}"))
                    })?;
                    tx.set_cart_item_quantity(item.id, merged)?;
                }
                None => {
                    tx.insert_cart_item(&NewCartItem {
                        cart_id: cart.id,
                        product_id: product.id,
                        quantity,
                        unit_price: product.price,
                    })?;
                }
            }
            view_of(tx, cart)
        })
    }

    /// A quantity of zero or less removes the line.
    pub fn update_item_quantity(&self, item_id: Uuid, quantity: i32) -> Result<CartView, DomainError> {
        self.store.transaction(|tx| {
            let item = tx
                .find_cart_item(item_id)?
                .ok_or_else(|| DomainError::not_found("CartItem", item_id))?;
            if quantity <= 0 {
                tx.delete_cart_item(item.id)?;
            } else {
                tx.set_cart_item_quantity(item.id, quantity)?;
            }
            let cart = require_cart(tx, item.cart_id)?;
            view_of(tx, cart)
        })
    }

    pub fn remove_item(&self, item_id: Uuid) -> Result<CartView, DomainError> {
        self.store.transaction(|tx| {
            let item = tx
                .find_cart_item(item_id)?
                .ok_or_else(|| DomainError::not_found("CartItem", item_id))?;
            tx.delete_cart_item(item.id)?;
            let cart = require_cart(tx, item.cart_id)?;
            view_of(tx, cart)
        })
    }

    pub fn clear_cart(&self, user_id: Uuid) -> Result<CartView, DomainError> {
        let view = self.store.transaction(|tx| {
            let cart = require_user_cart(tx, user_id)?;
            tx.clear_cart_items(cart.id)?;
            Ok(CartView {
                cart,
                items: Vec::new(),
            })
        })?;
        log::info!("Cleared cart {}", view.cart.id);
        Ok(view)
    }

    /// Turns the user's cart into an order and empties the cart, all in one
    /// transaction. Lines are priced at the products' current prices.
    pub fn checkout(&self, user_id: Uuid, checkout: CheckoutRequest) -> Result<OrderView, DomainError> {
        let view = self.store.transaction(|tx| {
            let cart = require_user_cart(tx, user_id)?;
            let cart = view_of(tx, cart)?;
            if cart.items.is_empty() {
                return Err(DomainError::InvalidInput(format!(
                    "cart {} is empty",
                    cart.cart.id
                )));
            }
            let request = OrderRequest {
                user_id,
                shipping_address: checkout.shipping_address.clone(),
                payment_method: checkout.payment_method,
                note: checkout.note.clone(),
                discount_code: checkout.discount_code.clone(),
                items: cart.line_items(),
            };
            let order = place_order(tx, &request, Utc::now())?;
            tx.clear_cart_items(cart.cart.id)?;
            Ok(order)
        })?;
        log::info!(
            "Checked out cart of user {} into order {} (final {})",
            user_id,
            view.order.id,
            view.order.final_price
        );
        dispatch_invoice(self.invoices.as_ref(), &view);
        Ok(view)
    }
}
