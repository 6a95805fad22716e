//! A [`Store`] backed by process memory.
//!
//! A transaction works on a copy of the whole state under the lock and swaps
//! it in only when the closure succeeds, so failed calls leave nothing behind.
//! Unique keys and delete rules mirror the Postgres schema.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartItem, NewCartItem};
use crate::domain::catalog::{collect_subtree, Category, CategoryInput, Product, ProductInput};
use crate::domain::discount::{Discount, DiscountInput, DiscountUsage, NewDiscountUsage};
use crate::domain::errors::DomainError;
use crate::domain::invoice::{Invoice, NewInvoice};
use crate::domain::order::{
    NewOrder, NewOrderDetail, Order, OrderDetail, OrderStatus, ProductSales,
};
use crate::domain::page::{Page, PageRequest};
use crate::domain::ports::{
    CartRepository, CategoryRepository, DiscountRepository, InvoiceRepository, OrderRepository,
    ProductRepository, Store, StoreTx, UserRepository,
};
use crate::domain::user::{User, UserInput, UserStatus};

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<MemState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for InMemoryStore {
    fn transaction<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, DomainError>,
    {
        // Work happens on a copy, so the guarded state is intact even if a
        // previous transaction panicked.
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut working = guard.clone();
        let value = f(&mut working)?;
        *guard = working;
        Ok(value)
    }
}

/// Rows in insertion order, which doubles as `created_at` order.
#[derive(Debug, Clone, Default)]
struct MemState {
    users: Vec<User>,
    categories: Vec<Category>,
    products: Vec<Product>,
    discounts: Vec<Discount>,
    discount_usages: Vec<DiscountUsage>,
    orders: Vec<Order>,
    order_details: Vec<OrderDetail>,
    carts: Vec<Cart>,
    cart_items: Vec<CartItem>,
    invoices: Vec<Invoice>,
}

fn conflict(what: impl Into<String>) -> DomainError {
    DomainError::Conflict(what.into())
}

impl MemState {
    fn product_name(&self, product_id: Uuid) -> String {
        self.products
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }

    fn named_detail(&self, detail: &OrderDetail) -> OrderDetail {
        OrderDetail {
            product_name: self.product_name(detail.product_id),
            ..detail.clone()
        }
    }

    fn named_item(&self, item: &CartItem) -> CartItem {
        CartItem {
            product_name: self.product_name(item.product_id),
            ..item.clone()
        }
    }

    fn check_user_unique(&self, id: Option<Uuid>, username: &str) -> Result<(), DomainError> {
        if self
            .users
            .iter()
            .any(|u| Some(u.id) != id && u.username == username)
        {
            return Err(conflict(format!("username '{username}' is already taken")));
        }
        Ok(())
    }

    fn check_category_unique(&self, id: Option<Uuid>, name: &str) -> Result<(), DomainError> {
        if self
            .categories
            .iter()
            .any(|c| Some(c.id) != id && c.name == name)
        {
            return Err(conflict(format!("category '{name}' already exists")));
        }
        Ok(())
    }

    fn check_product_unique(&self, id: Option<Uuid>, input: &ProductInput) -> Result<(), DomainError> {
        for other in self.products.iter().filter(|p| Some(p.id) != id) {
            if other.name == input.name {
                return Err(conflict(format!("product '{}' already exists", input.name)));
            }
            if input.sku.is_some() && other.sku == input.sku {
                return Err(conflict(format!(
                    "sku '{}' is already used",
                    input.sku.as_deref().unwrap_or_default()
                )));
            }
        }
        Ok(())
    }

    fn check_discount_unique(&self, id: Option<Uuid>, code: &str) -> Result<(), DomainError> {
        if self
            .discounts
            .iter()
            .any(|d| Some(d.id) != id && d.code.eq_ignore_ascii_case(code))
        {
            return Err(conflict(format!("discount code '{code}' already exists")));
        }
        Ok(())
    }
}

impl UserRepository for MemState {
    fn insert_user(&mut self, input: &UserInput) -> Result<User, DomainError> {
        self.check_user_unique(None, &input.username)?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: input.username.clone(),
            email: input.email.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            phone_number: input.phone_number.clone(),
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        self.users.push(user.clone());
        Ok(user)
    }

    fn find_user(&mut self, id: Uuid) -> Result<Option<User>, DomainError> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.iter().find(|u| u.username == username).cloned())
    }

    fn update_user(&mut self, id: Uuid, input: &UserInput) -> Result<Option<User>, DomainError> {
        self.check_user_unique(Some(id), &input.username)?;
        let Some(user) = self.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.username = input.username.clone();
        user.email = input.email.clone();
        user.first_name = input.first_name.clone();
        user.last_name = input.last_name.clone();
        user.phone_number = input.phone_number.clone();
        user.status = input.status;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    fn set_user_status(&mut self, id: Uuid, status: UserStatus) -> Result<bool, DomainError> {
        let Some(user) = self.users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };
        user.status = status;
        user.updated_at = Utc::now();
        Ok(true)
    }

    fn delete_user(&mut self, id: Uuid) -> Result<bool, DomainError> {
        if !self.users.iter().any(|u| u.id == id) {
            return Ok(false);
        }
        if self.orders.iter().any(|o| o.user_id == id) {
            return Err(conflict(format!("user {id} still has orders")));
        }
        let cart_ids: Vec<Uuid> = self
            .carts
            .iter()
            .filter(|c| c.user_id == id)
            .map(|c| c.id)
            .collect();
        self.cart_items.retain(|i| !cart_ids.contains(&i.cart_id));
        self.carts.retain(|c| c.user_id != id);
        self.discount_usages.retain(|u| u.user_id != id);
        self.users.retain(|u| u.id != id);
        Ok(true)
    }

    fn list_users(&mut self, page: PageRequest) -> Result<Page<User>, DomainError> {
        Ok(Page::from_slice(&self.users, page))
    }
}

impl CategoryRepository for MemState {
    fn insert_category(&mut self, input: &CategoryInput) -> Result<Category, DomainError> {
        self.check_category_unique(None, &input.name)?;
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            parent_id: input.parent_id,
            status: input.status,
            is_hot: input.is_hot,
            is_new: input.is_new,
            created_at: now,
            updated_at: now,
        };
        self.categories.push(category.clone());
        Ok(category)
    }

    fn find_category(&mut self, id: Uuid) -> Result<Option<Category>, DomainError> {
        Ok(self.categories.iter().find(|c| c.id == id).cloned())
    }

    fn update_category(
        &mut self,
        id: Uuid,
        input: &CategoryInput,
    ) -> Result<Option<Category>, DomainError> {
        self.check_category_unique(Some(id), &input.name)?;
        if input.parent_id == Some(id) {
            return Err(conflict(format!("category {id} cannot be its own parent")));
        }
        let Some(category) = self.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        category.name = input.name.clone();
        category.parent_id = input.parent_id;
        category.status = input.status;
        category.is_hot = input.is_hot;
        category.is_new = input.is_new;
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    fn delete_category(&mut self, id: Uuid) -> Result<bool, DomainError> {
        if !self.categories.iter().any(|c| c.id == id) {
            return Ok(false);
        }
        let subtree = collect_subtree(id, &self.categories);
        if self
            .products
            .iter()
            .any(|p| subtree.contains(&p.category_id))
        {
            return Err(conflict(format!("category {id} still has products")));
        }
        self.categories.retain(|c| !subtree.contains(&c.id));
        Ok(true)
    }

    fn list_categories(&mut self, page: PageRequest) -> Result<Page<Category>, DomainError> {
        Ok(Page::from_slice(&self.categories, page))
    }

    fn all_categories(&mut self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.clone())
    }
}

impl ProductRepository for MemState {
    fn insert_product(&mut self, input: &ProductInput) -> Result<Product, DomainError> {
        self.check_product_unique(None, input)?;
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            slug: input.slug.clone(),
            description: input.description.clone(),
            short_description: input.short_description.clone(),
            price: input.price.clone(),
            sale_price: input.sale_price.clone(),
            stock_quantity: input.stock_quantity,
            sku: input.sku.clone(),
            thumbnail: input.thumbnail.clone(),
            status: input.status,
            tag: input.tag,
            category_id: input.category_id,
            image_urls: input.image_urls.clone(),
            created_at: now,
            updated_at: now,
        };
        self.products.push(product.clone());
        Ok(product)
    }

    fn find_product(&mut self, id: Uuid) -> Result<Option<Product>, DomainError> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    fn update_product(
        &mut self,
        id: Uuid,
        input: &ProductInput,
    ) -> Result<Option<Product>, DomainError> {
        self.check_product_unique(Some(id), input)?;
        let Some(product) = self.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.name = input.name.clone();
        product.slug = input.slug.clone();
        product.description = input.description.clone();
        product.short_description = input.short_description.clone();
        product.price = input.price.clone();
        product.sale_price = input.sale_price.clone();
        product.stock_quantity = input.stock_quantity;
        product.sku = input.sku.clone();
        product.thumbnail = input.thumbnail.clone();
        product.status = input.status;
        product.tag = input.tag;
        product.category_id = input.category_id;
        if !input.image_urls.is_empty() {
            product.image_urls = input.image_urls.clone();
        }
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    fn delete_product(&mut self, id: Uuid) -> Result<bool, DomainError> {
        if !self.products.iter().any(|p| p.id == id) {
            return Ok(false);
        }
        if self.order_details.iter().any(|d| d.product_id == id) {
            return Err(conflict(format!("product {id} is referenced by orders")));
        }
        self.cart_items.retain(|i| i.product_id != id);
        self.products.retain(|p| p.id != id);
        Ok(true)
    }

    fn list_products(&mut self, page: PageRequest) -> Result<Page<Product>, DomainError> {
        Ok(Page::from_slice(&self.products, page))
    }

    fn count_products_in_categories(&mut self, category_ids: &[Uuid]) -> Result<i64, DomainError> {
        let count = self
            .products
            .iter()
            .filter(|p| category_ids.contains(&p.category_id))
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    fn count_order_lines_for_product(&mut self, product_id: Uuid) -> Result<i64, DomainError> {
        let count = self
            .order_details
            .iter()
            .filter(|d| d.product_id == product_id)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

impl DiscountRepository for MemState {
    fn insert_discount(&mut self, input: &DiscountInput) -> Result<Discount, DomainError> {
        self.check_discount_unique(None, &input.code)?;
        let now = Utc::now();
        let discount = Discount {
            id: Uuid::new_v4(),
            code: input.code.clone(),
            description: input.description.clone(),
            discount_type: input.discount_type,
            value: input.value.clone(),
            min_order_amount: input.min_order_amount.clone(),
            max_uses: input.max_uses,
            max_uses_per_user: input.max_uses_per_user,
            start_date: input.start_date,
            end_date: input.end_date,
            active: input.active,
            created_at: now,
            updated_at: now,
        };
        self.discounts.push(discount.clone());
        Ok(discount)
    }

    fn find_discount(&mut self, id: Uuid) -> Result<Option<Discount>, DomainError> {
        Ok(self.discounts.iter().find(|d| d.id == id).cloned())
    }

    fn find_discount_by_code(&mut self, code: &str) -> Result<Option<Discount>, DomainError> {
        Ok(self
            .discounts
            .iter()
            .find(|d| d.code.eq_ignore_ascii_case(code))
            .cloned())
    }

    // The store mutex already serialises whole transactions.
    fn lock_discount_by_code(&mut self, code: &str) -> Result<Option<Discount>, DomainError> {
        self.find_discount_by_code(code)
    }

    fn update_discount(
        &mut self,
        id: Uuid,
        input: &DiscountInput,
    ) -> Result<Option<Discount>, DomainError> {
        self.check_discount_unique(Some(id), &input.code)?;
        let Some(discount) = self.discounts.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        discount.code = input.code.clone();
        discount.description = input.description.clone();
        discount.discount_type = input.discount_type;
        discount.value = input.value.clone();
        discount.min_order_amount = input.min_order_amount.clone();
        discount.max_uses = input.max_uses;
        discount.max_uses_per_user = input.max_uses_per_user;
        discount.start_date = input.start_date;
        discount.end_date = input.end_date;
        discount.active = input.active;
        discount.updated_at = Utc::now();
        Ok(Some(discount.clone()))
    }

    fn delete_discount(&mut self, id: Uuid) -> Result<bool, DomainError> {
        let before = self.discounts.len();
        self.discounts.retain(|d| d.id != id);
        if self.discounts.len() == before {
            return Ok(false);
        }
        self.discount_usages.retain(|u| u.discount_id != id);
        for order in self.orders.iter_mut().filter(|o| o.discount_id == Some(id)) {
            order.discount_id = None;
        }
        Ok(true)
    }

    fn list_discounts(&mut self, page: PageRequest) -> Result<Page<Discount>, DomainError> {
        Ok(Page::from_slice(&self.discounts, page))
    }

    fn consume_discount_use(&mut self, id: Uuid) -> Result<bool, DomainError> {
        let Some(discount) = self.discounts.iter_mut().find(|d| d.id == id) else {
            return Ok(false);
        };
        match discount.max_uses {
            None => Ok(true),
            Some(remaining) if remaining > 0 => {
                discount.max_uses = Some(remaining - 1);
                discount.updated_at = Utc::now();
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    fn count_discount_usages(&mut self, user_id: Uuid, discount_id: Uuid) -> Result<i64, DomainError> {
        let count = self
            .discount_usages
            .iter()
            .filter(|u| u.user_id == user_id && u.discount_id == discount_id)
            .count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    fn insert_discount_usage(&mut self, usage: &NewDiscountUsage) -> Result<DiscountUsage, DomainError> {
        if self.discount_usages.iter().any(|u| {
            u.user_id == usage.user_id
                && u.discount_id == usage.discount_id
                && u.order_id == usage.order_id
        }) {
            return Err(conflict(format!(
                "discount {} already recorded for order {}",
                usage.discount_id, usage.order_id
            )));
        }
        let row = DiscountUsage {
            id: Uuid::new_v4(),
            user_id: usage.user_id,
            discount_id: usage.discount_id,
            order_id: usage.order_id,
            used_at: Utc::now(),
        };
        self.discount_usages.push(row.clone());
        Ok(row)
    }
}

impl OrderRepository for MemState {
    fn insert_order(&mut self, order: &NewOrder) -> Result<Order, DomainError> {
        let now = Utc::now();
        let row = Order {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            shipping_address: order.shipping_address.clone(),
            note: order.note.clone(),
            payment_method: order.payment_method,
            status: order.status,
            total_price: order.total_price.clone(),
            total_quantity: order.total_quantity,
            discount_id: order.discount_id,
            discount_amount: order.discount_amount.clone(),
            final_price: order.final_price.clone(),
            created_at: now,
            updated_at: now,
        };
        self.orders.push(row.clone());
        Ok(row)
    }

    fn insert_order_details(
        &mut self,
        details: &[NewOrderDetail],
    ) -> Result<Vec<OrderDetail>, DomainError> {
        let mut inserted = Vec::with_capacity(details.len());
        for detail in details {
            let row = OrderDetail {
                id: Uuid::new_v4(),
                order_id: detail.order_id,
                product_id: detail.product_id,
                product_name: String::new(),
                quantity: detail.quantity,
                unit_price: detail.unit_price.clone(),
                total_price: detail.total_price.clone(),
            };
            self.order_details.push(row.clone());
            inserted.push(self.named_detail(&row));
        }
        Ok(inserted)
    }

    fn find_order(&mut self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.iter().find(|o| o.id == id).cloned())
    }

    fn order_details(&mut self, order_id: Uuid) -> Result<Vec<OrderDetail>, DomainError> {
        Ok(self
            .order_details
            .iter()
            .filter(|d| d.order_id == order_id)
            .map(|d| self.named_detail(d))
            .collect())
    }

    fn find_order_detail(&mut self, id: Uuid) -> Result<Option<OrderDetail>, DomainError> {
        Ok(self
            .order_details
            .iter()
            .find(|d| d.id == id)
            .map(|d| self.named_detail(d)))
    }

    fn list_order_details(&mut self, page: PageRequest) -> Result<Page<OrderDetail>, DomainError> {
        let named: Vec<OrderDetail> = self
            .order_details
            .iter()
            .map(|d| self.named_detail(d))
            .collect();
        Ok(Page::from_slice(&named, page))
    }

    fn orders_by_user(&mut self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        Ok(self
            .orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect())
    }

    fn list_orders(&mut self, page: PageRequest) -> Result<Page<Order>, DomainError> {
        let newest_first: Vec<Order> = self.orders.iter().rev().cloned().collect();
        Ok(Page::from_slice(&newest_first, page))
    }

    fn set_order_status(&mut self, id: Uuid, status: OrderStatus) -> Result<bool, DomainError> {
        let Some(order) = self.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(false);
        };
        order.status = status;
        order.updated_at = Utc::now();
        Ok(true)
    }

    fn top_selling_products(&mut self, limit: i64) -> Result<Vec<ProductSales>, DomainError> {
        let mut by_product: HashMap<Uuid, (i64, BigDecimal)> = HashMap::new();
        for detail in &self.order_details {
            let entry = by_product
                .entry(detail.product_id)
                .or_insert_with(|| (0, BigDecimal::zero()));
            entry.0 += i64::from(detail.quantity);
            entry.1 += &detail.total_price;
        }
        let mut sales: Vec<ProductSales> = by_product
            .into_iter()
            .map(|(product_id, (quantity_sold, revenue))| ProductSales {
                product_id,
                product_name: self.product_name(product_id),
                quantity_sold,
                revenue,
            })
            .collect();
        sales.sort_by(|a, b| {
            b.quantity_sold
                .cmp(&a.quantity_sold)
                .then_with(|| a.product_name.cmp(&b.product_name))
        });
        sales.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(sales)
    }
}

impl CartRepository for MemState {
    fn insert_cart(&mut self, user_id: Uuid) -> Result<Cart, DomainError> {
        if self.carts.iter().any(|c| c.user_id == user_id) {
            return Err(conflict(format!("user {user_id} already has a cart")));
        }
        let now = Utc::now();
        let cart = Cart {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            updated_at: now,
        };
        self.carts.push(cart.clone());
        Ok(cart)
    }

    fn find_cart(&mut self, id: Uuid) -> Result<Option<Cart>, DomainError> {
        Ok(self.carts.iter().find(|c| c.id == id).cloned())
    }

    fn find_cart_by_user(&mut self, user_id: Uuid) -> Result<Option<Cart>, DomainError> {
        Ok(self.carts.iter().find(|c| c.user_id == user_id).cloned())
    }

    fn delete_cart(&mut self, id: Uuid) -> Result<bool, DomainError> {
        let before = self.carts.len();
        self.carts.retain(|c| c.id != id);
        if self.carts.len() == before {
            return Ok(false);
        }
        self.cart_items.retain(|i| i.cart_id != id);
        Ok(true)
    }

    fn list_carts(&mut self, page: PageRequest) -> Result<Page<Cart>, DomainError> {
        Ok(Page::from_slice(&self.carts, page))
    }

    fn cart_items(&mut self, cart_id: Uuid) -> Result<Vec<CartItem>, DomainError> {
        Ok(self
            .cart_items
            .iter()
            .filter(|i| i.cart_id == cart_id)
            .map(|i| self.named_item(i))
            .collect())
    }

    fn find_cart_item(&mut self, id: Uuid) -> Result<Option<CartItem>, DomainError> {
        Ok(self
            .cart_items
            .iter()
            .find(|i| i.id == id)
            .map(|i| self.named_item(i)))
    }

    fn insert_cart_item(&mut self, item: &NewCartItem) -> Result<CartItem, DomainError> {
        if self
            .cart_items
            .iter()
            .any(|i| i.cart_id == item.cart_id && i.product_id == item.product_id)
        {
            return Err(conflict(format!(
                "product {} is already in cart {}",
                item.product_id, item.cart_id
            )));
        }
        let row = CartItem {
            id: Uuid::new_v4(),
            cart_id: item.cart_id,
            product_id: item.product_id,
            product_name: String::new(),
            quantity: item.quantity,
            unit_price: item.unit_price.clone(),
        };
        self.cart_items.push(row.clone());
        Ok(self.named_item(&row))
    }

    fn set_cart_item_quantity(&mut self, id: Uuid, quantity: i32) -> Result<bool, DomainError> {
        let Some(item) = self.cart_items.iter_mut().find(|i| i.id == id) else {
            return Ok(false);
        };
        item.quantity = quantity;
        Ok(true)
    }

    fn delete_cart_item(&mut self, id: Uuid) -> Result<bool, DomainError> {
        let before = self.cart_items.len();
        self.cart_items.retain(|i| i.id != id);
        Ok(self.cart_items.len() != before)
    }

    fn clear_cart_items(&mut self, cart_id: Uuid) -> Result<usize, DomainError> {
        let before = self.cart_items.len();
        self.cart_items.retain(|i| i.cart_id != cart_id);
        Ok(before - self.cart_items.len())
    }
}

impl InvoiceRepository for MemState {
    fn insert_invoice(&mut self, invoice: &NewInvoice) -> Result<Invoice, DomainError> {
        if self.invoices.iter().any(|i| i.order_id == invoice.order_id) {
            return Err(conflict(format!(
                "order {} already has an invoice",
                invoice.order_id
            )));
        }
        let row = Invoice {
            id: Uuid::new_v4(),
            order_id: invoice.order_id,
            invoice_code: invoice.invoice_code.clone(),
            amount: invoice.amount.clone(),
            payment_method: invoice.payment_method,
            is_paid: false,
            document: invoice.document.clone(),
            issued_at: Utc::now(),
        };
        self.invoices.push(row.clone());
        Ok(row)
    }

    fn find_invoice_by_order(&mut self, order_id: Uuid) -> Result<Option<Invoice>, DomainError> {
        Ok(self.invoices.iter().find(|i| i.order_id == order_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::discount::DiscountType;

    fn user_input(username: &str) -> UserInput {
        UserInput {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: None,
            last_name: None,
            phone_number: None,
            status: UserStatus::Active,
        }
    }

    #[test]
    fn failed_transaction_discards_every_write() {
        let store = InMemoryStore::new();
        let result: Result<(), DomainError> = store.transaction(|tx| {
            tx.insert_user(&user_input("ghost"))?;
            Err(DomainError::Internal("boom".to_string()))
        });
        assert!(result.is_err());

        let users = store
            .transaction(|tx| tx.list_users(PageRequest::default()))
            .unwrap();
        assert_eq!(users.total, 0);
    }

    #[test]
    fn store_keeps_serving_after_a_transaction_panics() {
        let store = InMemoryStore::new();
        store
            .transaction(|tx| tx.insert_user(&user_input("kept")))
            .unwrap();

        let panicking = store.clone();
        let outcome = std::thread::spawn(move || {
            let _ = panicking.transaction(|tx| -> Result<(), DomainError> {
                tx.insert_user(&user_input("lost"))?;
                panic!("handler blew up");
            });
        })
        .join();
        assert!(outcome.is_err());

        let users = store
            .transaction(|tx| tx.list_users(PageRequest::default()))
            .unwrap();
        assert_eq!(users.total, 1);
        assert_eq!(users.items[0].username, "kept");
    }

    #[test]
    fn committed_transaction_is_visible_to_the_next_one() {
        let store = InMemoryStore::new();
        let created = store
            .transaction(|tx| tx.insert_user(&user_input("alice")))
            .unwrap();
        let found = store
            .transaction(|tx| tx.find_user_by_username("alice"))
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some(created.id));
    }

    #[test]
    fn duplicate_username_is_a_conflict() {
        let store = InMemoryStore::new();
        store
            .transaction(|tx| tx.insert_user(&user_input("alice")))
            .unwrap();
        let err = store
            .transaction(|tx| tx.insert_user(&user_input("alice")))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn discount_codes_collide_case_insensitively() {
        let store = InMemoryStore::new();
        let input = |code: &str| DiscountInput {
            code: code.to_string(),
            description: None,
            discount_type: DiscountType::Fixed,
            value: BigDecimal::from(5),
            min_order_amount: None,
            max_uses: Some(1),
            max_uses_per_user: None,
            start_date: None,
            end_date: None,
            active: true,
        };
        store
            .transaction(|tx| tx.insert_discount(&input("SAVE5")))
            .unwrap();
        let err = store
            .transaction(|tx| tx.insert_discount(&input("save5")))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn consuming_a_use_stops_at_zero() {
        let store = InMemoryStore::new();
        let discount = store
            .transaction(|tx| {
                tx.insert_discount(&DiscountInput {
                    code: "ONCE".to_string(),
                    description: None,
                    discount_type: DiscountType::Fixed,
                    value: BigDecimal::from(5),
                    min_order_amount: None,
                    max_uses: Some(1),
                    max_uses_per_user: None,
                    start_date: None,
                    end_date: None,
                    active: true,
                })
            })
            .unwrap();

        assert!(store.transaction(|tx| tx.consume_discount_use(discount.id)).unwrap());
        assert!(!store.transaction(|tx| tx.consume_discount_use(discount.id)).unwrap());
        let reloaded = store
            .transaction(|tx| tx.find_discount(discount.id))
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.max_uses, Some(0));
    }
}
