use utoipa::OpenApi;

use crate::handlers::{carts, categories, discounts, order_details, orders, products, users};

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(title = "Shop service", description = "Catalog, carts, discounts and orders"),
    paths(
        users::create_user,
        users::get_user,
        users::update_user,
        users::change_user_status,
        users::delete_user,
        users::list_users,
        categories::create_category,
        categories::category_tree,
        categories::get_category,
        categories::update_category,
        categories::delete_category,
        categories::list_categories,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        products::list_products,
        discounts::create_discount,
        discounts::get_discount_by_code,
        discounts::get_discount,
        discounts::update_discount,
        discounts::delete_discount,
        discounts::list_discounts,
        orders::create_order,
        orders::get_order,
        orders::orders_by_user,
        orders::list_orders,
        orders::cancel_order,
        orders::change_order_status,
        orders::get_invoice,
        order_details::list_details,
        order_details::top_selling,
        order_details::details_by_order,
        order_details::get_detail,
        carts::create_cart,
        carts::get_cart,
        carts::cart_by_user,
        carts::list_carts,
        carts::delete_cart,
        carts::add_item,
        carts::update_item,
        carts::remove_item,
        carts::clear_cart,
        carts::checkout,
    ),
    tags(
        (name = "users", description = "Customer accounts"),
        (name = "categories", description = "Category tree"),
        (name = "products", description = "Product catalog"),
        (name = "discounts", description = "Discount codes"),
        (name = "orders", description = "Order placement and lifecycle"),
        (name = "order-details", description = "Order lines and sales ranking"),
        (name = "carts", description = "Shopping carts and checkout"),
    )
)]
pub struct ApiDoc;
