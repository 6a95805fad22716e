//! Diesel row types and their mapping to domain entities.
//!
//! Enum columns are stored as their upper-case codes; a code the domain does
//! not know surfaces as `DomainError::InvalidInput` on read.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartItem, NewCartItem};
use crate::domain::catalog::{Category, CategoryInput, Product, ProductInput};
use crate::domain::discount::{Discount, DiscountInput, DiscountUsage, NewDiscountUsage};
use crate::domain::errors::DomainError;
use crate::domain::invoice::{Invoice, NewInvoice};
use crate::domain::order::{NewOrder, NewOrderDetail, Order, OrderDetail};
use crate::domain::user::{User, UserInput};
use crate::schema::{
    cart_items, carts, categories, discount_usages, discounts, invoices, order_details, orders,
    product_images, products, users,
};

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub status: String,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub struct UserChanges {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

impl NewUserRow {
    pub fn from_input(input: &UserInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: input.username.clone(),
            email: input.email.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            phone_number: input.phone_number.clone(),
            status: input.status.as_str().to_string(),
        }
    }
}

impl UserChanges {
    pub fn from_input(input: &UserInput) -> Self {
        Self {
            username: input.username.clone(),
            email: input.email.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            phone_number: input.phone_number.clone(),
            status: input.status.as_str().to_string(),
            updated_at: Utc::now(),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            phone_number: row.phone_number,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ── Categories ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub status: String,
    pub is_hot: bool,
    pub is_new: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = categories)]
pub struct NewCategoryRow {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub status: String,
    pub is_hot: bool,
    pub is_new: bool,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = categories)]
#[diesel(treat_none_as_null = true)]
pub struct CategoryChanges {
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub status: String,
    pub is_hot: bool,
    pub is_new: bool,
    pub updated_at: DateTime<Utc>,
}

impl NewCategoryRow {
    pub fn from_input(input: &CategoryInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            parent_id: input.parent_id,
            status: input.status.as_str().to_string(),
            is_hot: input.is_hot,
            is_new: input.is_new,
        }
    }
}

impl CategoryChanges {
    pub fn from_input(input: &CategoryInput) -> Self {
        Self {
            name: input.name.clone(),
            parent_id: input.parent_id,
            status: input.status.as_str().to_string(),
            is_hot: input.is_hot,
            is_new: input.is_new,
            updated_at: Utc::now(),
        }
    }
}

impl TryFrom<CategoryRow> for Category {
    type Error = DomainError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Category {
            id: row.id,
            name: row.name,
            parent_id: row.parent_id,
            status: row.status.parse()?,
            is_hot: row.is_hot,
            is_new: row.is_new,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ── Products ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price: BigDecimal,
    pub sale_price: Option<BigDecimal>,
    pub stock_quantity: i32,
    pub sku: Option<String>,
    pub thumbnail: Option<String>,
    pub status: String,
    pub tag: String,
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: Uuid,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price: BigDecimal,
    pub sale_price: Option<BigDecimal>,
    pub stock_quantity: i32,
    pub sku: Option<String>,
    pub thumbnail: Option<String>,
    pub status: String,
    pub tag: String,
    pub category_id: Uuid,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = products)]
#[diesel(treat_none_as_null = true)]
pub struct ProductChanges {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub price: BigDecimal,
    pub sale_price: Option<BigDecimal>,
    pub stock_quantity: i32,
    pub sku: Option<String>,
    pub thumbnail: Option<String>,
    pub status: String,
    pub tag: String,
    pub category_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

impl NewProductRow {
    pub fn from_input(input: &ProductInput) -> Self {
        Self {
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
            status: input.status.as_str().to_string(),
            tag: input.tag.as_str().to_string(),
            category_id: input.category_id,
        }
    }
}

impl ProductChanges {
    pub fn from_input(input: &ProductInput) -> Self {
        Self {
            name: input.name.clone(),
            slug: input.slug.clone(),
            description: input.description.clone(),
            short_description: input.short_description.clone(),
            price: input.price.clone(),
            sale_price: input.sale_price.clone(),
            stock_quantity: input.stock_quantity,
            sku: input.sku.clone(),
            thumbnail: input.thumbnail.clone(),
            status: input.status.as_str().to_string(),
            tag: input.tag.as_str().to_string(),
            category_id: input.category_id,
            updated_at: Utc::now(),
        }
    }
}

impl ProductRow {
    pub fn into_product(self, image_urls: Vec<String>) -> Result<Product, DomainError> {
        Ok(Product {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            short_description: self.short_description,
            price: self.price,
            sale_price: self.sale_price,
            stock_quantity: self.stock_quantity,
            sku: self.sku,
            thumbnail: self.thumbnail,
            status: self.status.parse()?,
            tag: self.tag.parse()?,
            category_id: self.category_id,
            image_urls,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = product_images)]
#[diesel(belongs_to(ProductRow, foreign_key = product_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductImageRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub image_url: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = product_images)]
pub struct NewProductImageRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub image_url: String,
    pub position: i32,
}

// ── Discounts ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = discounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DiscountRow {
    pub id: Uuid,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: String,
    pub value: BigDecimal,
    pub min_order_amount: Option<BigDecimal>,
    pub max_uses: Option<i32>,
    pub max_uses_per_user: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = discounts)]
pub struct NewDiscountRow {
    pub id: Uuid,
    pub code: String,
    pub description: Option<String>,
    pub discount_type: String,
    pub value: BigDecimal,
    pub min_order_amount: Option<BigDecimal>,
    pub max_uses: Option<i32>,
    pub max_uses_per_user: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub active: bool,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = discounts)]
#[diesel(treat_none_as_null = true)]
pub struct DiscountChanges {
    pub code: String,
    pub description: Option<String>,
    pub discount_type: String,
    pub value: BigDecimal,
    pub min_order_amount: Option<BigDecimal>,
    pub max_uses: Option<i32>,
    pub max_uses_per_user: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub active: bool,
    pub updated_at: DateTime<Utc>,
}

impl NewDiscountRow {
    pub fn from_input(input: &DiscountInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: input.code.clone(),
            description: input.description.clone(),
            discount_type: input.discount_type.as_str().to_string(),
            value: input.value.clone(),
            min_order_amount: input.min_order_amount.clone(),
            max_uses: input.max_uses,
            max_uses_per_user: input.max_uses_per_user,
            start_date: input.start_date,
            end_date: input.end_date,
            active: input.active,
        }
    }
}

impl DiscountChanges {
    pub fn from_input(input: &DiscountInput) -> Self {
        Self {
            code: input.code.clone(),
            description: input.description.clone(),
            discount_type: input.discount_type.as_str().to_string(),
            value: input.value.clone(),
            min_order_amount: input.min_order_amount.clone(),
            max_uses: input.max_uses,
            max_uses_per_user: input.max_uses_per_user,
            start_date: input.start_date,
            end_date: input.end_date,
            active: input.active,
            updated_at: Utc::now(),
        }
    }
}

impl TryFrom<DiscountRow> for Discount {
    type Error = DomainError;

    fn try_from(row: DiscountRow) -> Result<Self, Self::Error> {
        Ok(Discount {
            id: row.id,
            code: row.code,
            description: row.description,
            discount_type: row.discount_type.parse()?,
            value: row.value,
            min_order_amount: row.min_order_amount,
            max_uses: row.max_uses,
            max_uses_per_user: row.max_uses_per_user,
            start_date: row.start_date,
            end_date: row.end_date,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = discount_usages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DiscountUsageRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub discount_id: Uuid,
    pub order_id: Uuid,
    pub used_at: DateTime<Utc>,
}

impl DiscountUsageRow {
    pub fn from_usage(usage: &NewDiscountUsage) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: usage.user_id,
            discount_id: usage.discount_id,
            order_id: usage.order_id,
            used_at: Utc::now(),
        }
    }
}

impl From<DiscountUsageRow> for DiscountUsage {
    fn from(row: DiscountUsageRow) -> Self {
        DiscountUsage {
            id: row.id,
            user_id: row.user_id,
            discount_id: row.discount_id,
            order_id: row.order_id,
            used_at: row.used_at,
        }
    }
}

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shipping_address: Option<String>,
    pub note: Option<String>,
    pub payment_method: String,
    pub status: String,
    pub total_price: BigDecimal,
    pub total_quantity: i32,
    pub discount_id: Option<Uuid>,
    pub discount_amount: BigDecimal,
    pub final_price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shipping_address: Option<String>,
    pub note: Option<String>,
    pub payment_method: String,
    pub status: String,
    pub total_price: BigDecimal,
    pub total_quantity: i32,
    pub discount_id: Option<Uuid>,
    pub discount_amount: BigDecimal,
    pub final_price: BigDecimal,
}

impl From<&NewOrder> for NewOrderRow {
    fn from(order: &NewOrder) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: order.user_id,
            shipping_address: order.shipping_address.clone(),
            note: order.note.clone(),
            payment_method: order.payment_method.as_str().to_string(),
            status: order.status.as_str().to_string(),
            total_price: order.total_price.clone(),
            total_quantity: order.total_quantity,
            discount_id: order.discount_id,
            discount_amount: order.discount_amount.clone(),
            final_price: order.final_price.clone(),
        }
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: row.id,
            user_id: row.user_id,
            shipping_address: row.shipping_address,
            note: row.note,
            payment_method: row.payment_method.parse()?,
            status: row.status.parse()?,
            total_price: row.total_price,
            total_quantity: row.total_quantity,
            discount_id: row.discount_id,
            discount_amount: row.discount_amount,
            final_price: row.final_price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_details)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderDetailRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub line_no: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub total_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_details)]
pub struct NewOrderDetailRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub line_no: i32,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub total_price: BigDecimal,
}

impl NewOrderDetailRow {
    pub fn from_detail(detail: &NewOrderDetail, line_no: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id: detail.order_id,
            product_id: detail.product_id,
            line_no,
            quantity: detail.quantity,
            unit_price: detail.unit_price.clone(),
            total_price: detail.total_price.clone(),
        }
    }
}

impl OrderDetailRow {
    pub fn into_detail(self, product_name: String) -> OrderDetail {
        OrderDetail {
            id: self.id,
            order_id: self.order_id,
            product_id: self.product_id,
            product_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_price: self.total_price,
        }
    }
}

// ── Carts ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Insertable)]
#[diesel(table_name = carts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartRow {
    pub fn for_user(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Cart {
            id: row.id,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = cart_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartItemRow {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cart_items)]
pub struct NewCartItemRow {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl NewCartItemRow {
    pub fn from_item(item: &NewCartItem) -> Self {
        Self {
            id: Uuid::new_v4(),
            cart_id: item.cart_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price.clone(),
        }
    }
}

impl CartItemRow {
    pub fn into_item(self, product_name: String) -> CartItem {
        CartItem {
            id: self.id,
            cart_id: self.cart_id,
            product_id: self.product_id,
            product_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

// ── Invoices ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = invoices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InvoiceRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub invoice_code: String,
    pub amount: BigDecimal,
    pub payment_method: String,
    pub is_paid: bool,
    pub document: String,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = invoices)]
pub struct NewInvoiceRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub invoice_code: String,
    pub amount: BigDecimal,
    pub payment_method: String,
    pub document: String,
}

impl NewInvoiceRow {
    pub fn from_invoice(invoice: &NewInvoice) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id: invoice.order_id,
            invoice_code: invoice.invoice_code.clone(),
            amount: invoice.amount.clone(),
            payment_method: invoice.payment_method.as_str().to_string(),
            document: invoice.document.clone(),
        }
    }
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DomainError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        Ok(Invoice {
            id: row.id,
            order_id: row.order_id,
            invoice_code: row.invoice_code,
            amount: row.amount,
            payment_method: row.payment_method.parse()?,
            is_paid: row.is_paid,
            document: row.document,
            issued_at: row.issued_at,
        })
    }
}
