//! Use cases. Each mutating call runs in exactly one `Store::transaction`.

pub mod cart_service;
pub mod category_service;
pub mod discount_service;
pub mod invoice_service;
pub mod order_service;
pub mod product_service;
pub mod user_service;

pub use cart_service::{CartService, CheckoutRequest};
pub use category_service::CategoryService;
pub use discount_service::DiscountService;
pub use invoice_service::{InvoiceService, LogMailer, QueuedInvoices};
pub use order_service::OrderService;
pub use product_service::ProductService;
pub use user_service::UserService;
