pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::{
    CartService, CategoryService, DiscountService, InvoiceService, OrderService, ProductService,
    QueuedInvoices, UserService,
};
use domain::errors::DomainError;
use domain::ports::{InvoiceGenerator, InvoiceMailer};
use handlers::{carts, categories, discounts, order_details, orders, products, users};
use infrastructure::ShopStore;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), DomainError> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DomainError::Internal(format!("migrations failed: {e}")))?;
    log::info!("Applied {} pending migration(s)", applied.len());
    Ok(())
}

/// The services shared by every worker.
pub struct AppState {
    pub users: UserService<ShopStore>,
    pub categories: CategoryService<ShopStore>,
    pub products: ProductService<ShopStore>,
    pub discounts: DiscountService<ShopStore>,
    pub orders: OrderService<ShopStore>,
    pub carts: CartService<ShopStore>,
}

impl AppState {
    /// Wires the services over `store`. Invoices are produced on a background
    /// worker started here.
    pub fn new(store: ShopStore, mailer: Arc<dyn InvoiceMailer>) -> std::io::Result<Self> {
        let invoices: Arc<dyn InvoiceGenerator> = Arc::new(QueuedInvoices::spawn(Arc::new(
            InvoiceService::new(store.clone(), mailer),
        ))?);
        Ok(Self {
            users: UserService::new(store.clone()),
            categories: CategoryService::new(store.clone()),
            products: ProductService::new(store.clone()),
            discounts: DiscountService::new(store.clone()),
            orders: OrderService::new(store.clone(), invoices.clone()),
            carts: CartService::new(store, invoices),
        })
    }
}

/// Registers every route. Literal segments come before `{id}` captures of the
/// same depth so they are not parsed as ids.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::post().to(users::create_user))
            .route("", web::get().to(users::list_users))
            .route("/{id}", web::get().to(users::get_user))
            .route("/{id}", web::put().to(users::update_user))
            .route("/{id}", web::delete().to(users::delete_user))
            .route("/{id}/status", web::patch().to(users::change_user_status)),
    )
    .service(
        web::scope("/categories")
            .route("", web::post().to(categories::create_category))
            .route("", web::get().to(categories::list_categories))
            .route("/tree", web::get().to(categories::category_tree))
            .route("/{id}", web::get().to(categories::get_category))
            .route("/{id}", web::put().to(categories::update_category))
            .route("/{id}", web::delete().to(categories::delete_category)),
    )
    .service(
        web::scope("/products")
            .route("", web::post().to(products::create_product))
            .route("", web::get().to(products::list_products))
            .route("/{id}", web::get().to(products::get_product))
            .route("/{id}", web::put().to(products::update_product))
            .route("/{id}", web::delete().to(products::delete_product)),
    )
    .service(
        web::scope("/discounts")
            .route("", web::post().to(discounts::create_discount))
            .route("", web::get().to(discounts::list_discounts))
            .route("/code/{code}", web::get().to(discounts::get_discount_by_code))
            .route("/{id}", web::get().to(discounts::get_discount))
            .route("/{id}", web::put().to(discounts::update_discount))
            .route("/{id}", web::delete().to(discounts::delete_discount)),
    )
    .service(
        web::scope("/orders")
            .route("", web::post().to(orders::create_order))
            .route("", web::get().to(orders::list_orders))
            .route("/user/{user_id}", web::get().to(orders::orders_by_user))
            .route("/{id}", web::get().to(orders::get_order))
            .route("/{id}/cancel", web::patch().to(orders::cancel_order))
            .route("/{id}/status", web::patch().to(orders::change_order_status))
            .route("/{id}/invoice", web::get().to(orders::get_invoice)),
    )
    .service(
        web::scope("/order-details")
            .route("", web::get().to(order_details::list_details))
            .route("/top-selling", web::get().to(order_details::top_selling))
            .route("/order/{order_id}", web::get().to(order_details::details_by_order))
            .route("/{id}", web::get().to(order_details::get_detail)),
    )
    .service(
        web::scope("/carts")
            .route("", web::post().to(carts::create_cart))
            .route("", web::get().to(carts::list_carts))
            .route("/items/{item_id}", web::patch().to(carts::update_item))
            .route("/items/{item_id}", web::delete().to(carts::remove_item))
            .route("/user/{user_id}", web::get().to(carts::cart_by_user))
            .route("/user/{user_id}/items", web::delete().to(carts::clear_cart))
            .route("/user/{user_id}/checkout", web::post().to(carts::checkout))
            .route("/{id}", web::get().to(carts::get_cart))
            .route("/{id}", web::delete().to(carts::delete_cart))
            .route("/{id}/items", web::post().to(carts::add_item)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(state);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
