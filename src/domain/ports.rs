//! Persistence and notification boundaries.
//!
//! Every repository method runs against the connection of the transaction it
//! was handed through [`Store::transaction`]; "not found" is an `Option`, not
//! an error.

use uuid::Uuid;

use super::cart::{Cart, CartItem, NewCartItem};
use super::catalog::{Category, CategoryInput, Product, ProductInput};
use super::discount::{Discount, DiscountInput, DiscountUsage, NewDiscountUsage};
use super::errors::DomainError;
use super::invoice::{Invoice, NewInvoice};
use super::order::{NewOrder, NewOrderDetail, Order, OrderDetail, OrderStatus, OrderView, ProductSales};
use super::page::{Page, PageRequest};
use super::user::{User, UserInput, UserStatus};

pub trait UserRepository {
    fn insert_user(&mut self, input: &UserInput) -> Result<User, DomainError>;
    fn find_user(&mut self, id: Uuid) -> Result<Option<User>, DomainError>;
    fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>, DomainError>;
    fn update_user(&mut self, id: Uuid, input: &UserInput) -> Result<Option<User>, DomainError>;
    fn set_user_status(&mut self, id: Uuid, status: UserStatus) -> Result<bool, DomainError>;
    fn delete_user(&mut self, id: Uuid) -> Result<bool, DomainError>;
    fn list_users(&mut self, page: PageRequest) -> Result<Page<User>, DomainError>;
}

pub trait CategoryRepository {
    fn insert_category(&mut self, input: &CategoryInput) -> Result<Category, DomainError>;
    fn find_category(&mut self, id: Uuid) -> Result<Option<Category>, DomainError>;
    fn update_category(
        &mut self,
        id: Uuid,
        input: &CategoryInput,
    ) -> Result<Option<Category>, DomainError>;
    /// Deletes the category and, through the parent reference, its
    /// descendants.
    fn delete_category(&mut self, id: Uuid) -> Result<bool, DomainError>;
    fn list_categories(&mut self, page: PageRequest) -> Result<Page<Category>, DomainError>;
    fn all_categories(&mut self) -> Result<Vec<Category>, DomainError>;
}

pub trait ProductRepository {
    fn insert_product(&mut self, input: &ProductInput) -> Result<Product, DomainError>;
    fn find_product(&mut self, id: Uuid) -> Result<Option<Product>, DomainError>;
    /// Replaces the image set only when `input.image_urls` is non-empty.
    fn update_product(
        &mut self,
        id: Uuid,
        input: &ProductInput,
    ) -> Result<Option<Product>, DomainError>;
    /// Deletes the product together with its images.
    fn delete_product(&mut self, id: Uuid) -> Result<bool, DomainError>;
    fn list_products(&mut self, page: PageRequest) -> Result<Page<Product>, DomainError>;
    fn count_products_in_categories(&mut self, category_ids: &[Uuid]) -> Result<i64, DomainError>;
    fn count_order_lines_for_product(&mut self, product_id: Uuid) -> Result<i64, DomainError>;
}

pub trait DiscountRepository {
    fn insert_discount(&mut self, input: &DiscountInput) -> Result<Discount, DomainError>;
    fn find_discount(&mut self, id: Uuid) -> Result<Option<Discount>, DomainError>;
    /// Case-insensitive lookup.
    fn find_discount_by_code(&mut self, code: &str) -> Result<Option<Discount>, DomainError>;
    /// Like `find_discount_by_code`, but holds the row until the transaction
    /// ends so concurrent applications of one code run one after another.
    fn lock_discount_by_code(&mut self, code: &str) -> Result<Option<Discount>, DomainError>;
    fn update_discount(
        &mut self,
        id: Uuid,
        input: &DiscountInput,
    ) -> Result<Option<Discount>, DomainError>;
    fn delete_discount(&mut self, id: Uuid) -> Result<bool, DomainError>;
    fn list_discounts(&mut self, page: PageRequest) -> Result<Page<Discount>, DomainError>;
    /// Atomically takes one use off a limited discount. Returns `false` when no
    /// use was left. Unlimited discounts always succeed without a write.
    fn consume_discount_use(&mut self, id: Uuid) -> Result<bool, DomainError>;
    fn count_discount_usages(&mut self, user_id: Uuid, discount_id: Uuid) -> Result<i64, DomainError>;
    fn insert_discount_usage(&mut self, usage: &NewDiscountUsage) -> Result<DiscountUsage, DomainError>;
}

pub trait OrderRepository {
    fn insert_order(&mut self, order: &NewOrder) -> Result<Order, DomainError>;
    fn insert_order_details(
        &mut self,
        details: &[NewOrderDetail],
    ) -> Result<Vec<OrderDetail>, DomainError>;
    fn find_order(&mut self, id: Uuid) -> Result<Option<Order>, DomainError>;
    fn order_details(&mut self, order_id: Uuid) -> Result<Vec<OrderDetail>, DomainError>;
    fn find_order_detail(&mut self, id: Uuid) -> Result<Option<OrderDetail>, DomainError>;
    fn list_order_details(&mut self, page: PageRequest) -> Result<Page<OrderDetail>, DomainError>;
    /// Newest first.
    fn orders_by_user(&mut self, user_id: Uuid) -> Result<Vec<Order>, DomainError>;
    /// Newest first.
    fn list_orders(&mut self, page: PageRequest) -> Result<Page<Order>, DomainError>;
    fn set_order_status(&mut self, id: Uuid, status: OrderStatus) -> Result<bool, DomainError>;
    fn top_selling_products(&mut self, limit: i64) -> Result<Vec<ProductSales>, DomainError>;
}

pub trait CartRepository {
    fn insert_cart(&mut self, user_id: Uuid) -> Result<Cart, DomainError>;
    fn find_cart(&mut self, id: Uuid) -> Result<Option<Cart>, DomainError>;
    fn find_cart_by_user(&mut self, user_id: Uuid) -> Result<Option<Cart>, DomainError>;
    /// Deletes the cart together with its items.
    fn delete_cart(&mut self, id: Uuid) -> Result<bool, DomainError>;
    fn list_carts(&mut self, page: PageRequest) -> Result<Page<Cart>, DomainError>;
    fn cart_items(&mut self, cart_id: Uuid) -> Result<Vec<CartItem>, DomainError>;
    fn find_cart_item(&mut self, id: Uuid) -> Result<Option<CartItem>, DomainError>;
    fn insert_cart_item(&mut self, item: &NewCartItem) -> Result<CartItem, DomainError>;
    fn set_cart_item_quantity(&mut self, id: Uuid, quantity: i32) -> Result<bool, DomainError>;
    fn delete_cart_item(&mut self, id: Uuid) -> Result<bool, DomainError>;
    /// Removes every item of the cart, returning how many were removed.
    fn clear_cart_items(&mut self, cart_id: Uuid) -> Result<usize, DomainError>;
}

pub trait InvoiceRepository {
    fn insert_invoice(&mut self, invoice: &NewInvoice) -> Result<Invoice, DomainError>;
    fn find_invoice_by_order(&mut self, order_id: Uuid) -> Result<Option<Invoice>, DomainError>;
}

/// Everything reachable inside one transaction.
pub trait StoreTx:
    UserRepository
    + CategoryRepository
    + ProductRepository
    + DiscountRepository
    + OrderRepository
    + CartRepository
    + InvoiceRepository
{
}

impl<T> StoreTx for T where
    T: UserRepository
        + CategoryRepository
        + ProductRepository
        + DiscountRepository
        + OrderRepository
        + CartRepository
        + InvoiceRepository
{
}

/// Runs a unit of work atomically: every write made through the handed-out
/// [`StoreTx`] is committed when `f` returns `Ok` and rolled back otherwise.
pub trait Store: Clone + Send + Sync + 'static {
    fn transaction<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, DomainError>;
}

/// Produces and delivers the invoice of a freshly placed order.
pub trait InvoiceGenerator: Send + Sync {
    fn generate_and_send(&self, order: &OrderView) -> Result<(), DomainError>;
}

/// Outbound mail. Delivery itself lives outside this service.
pub trait InvoiceMailer: Send + Sync {
    fn send_invoice(&self, recipient: &str, subject: &str, document: &str) -> Result<(), DomainError>;
}
