//! HTTP tests against the in-memory store. No external services needed.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use bigdecimal::BigDecimal;
use serde_json::{json, Value};
use shop_service::application::LogMailer;
use shop_service::configure;
use shop_service::domain::catalog::{
    CategoryInput, CategoryStatus, ProductInput, ProductStatus, ProductTag,
};
use shop_service::domain::user::{UserInput, UserStatus};
use shop_service::infrastructure::{InMemoryStore, ShopStore};
use shop_service::AppState;
use uuid::Uuid;

fn new_state() -> web::Data<AppState> {
    web::Data::new(
        AppState::new(ShopStore::Memory(InMemoryStore::new()), Arc::new(LogMailer))
            .expect("invoice worker should start"),
    )
}

macro_rules! shop_app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(configure)).await
    };
}

async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("response is not JSON")
    };
    (status, json)
}

fn post(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

fn get(uri: &str) -> test::TestRequest {
    test::TestRequest::get().uri(uri)
}

/// A customer "amy" and a 125.00 product, created through the services.
fn seed(state: &AppState) -> (Uuid, Uuid) {
    let user = state
        .users
        .create_user(UserInput {
            username: "amy".to_string(),
            email: "amy@example.com".to_string(),
            first_name: None,
            last_name: None,
            phone_number: None,
            status: UserStatus::Active,
        })
        .unwrap();
    let category = state
        .categories
        .create_category(CategoryInput {
            name: "Garden".to_string(),
            parent_id: None,
            status: CategoryStatus::Active,
            is_hot: false,
            is_new: false,
        })
        .unwrap();
    let product = state
        .products
        .create_product(ProductInput {
            name: "Hose".to_string(),
            slug: None,
            description: None,
            short_description: None,
            price: BigDecimal::from_str("125.00").unwrap(),
            sale_price: None,
            stock_quantity: 10,
            sku: None,
            thumbnail: None,
            status: ProductStatus::Active,
            tag: ProductTag::Normal,
            category_id: category.id,
            image_urls: vec![],
        })
        .unwrap();
    (user.id, product.id)
}

#[actix_web::test]
async fn order_with_percentage_discount_is_priced_and_counted() {
    let state = new_state();
    let app = shop_app!(state);
    let (user_id, hose_id) = seed(&state);

    let (status, discount) = send(
        &app,
        post(
            "/discounts",
            json!({ "code": "SAVE10", "discount_type": "PERCENTAGE", "value": "10", "max_uses": 5 }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{discount}");

    let (status, order) = send(
        &app,
        post(
            "/orders",
            json!({
                "user_id": user_id,
                "payment_method": "CREDIT_CARD",
                "discount_code": "save10",
                "items": [{ "product_id": hose_id, "quantity": 2 }]
            }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["total_price"], "250.00");
    assert_eq!(order["total_quantity"], 2);
    assert_eq!(order["discount_amount"], "25.00");
    assert_eq!(order["final_price"], "225.00");
    assert_eq!(order["discount_code"], "SAVE10");
    assert_eq!(order["details"][0]["total_price"], "250.00");

    let uri = format!("/discounts/{}", discount["id"].as_str().unwrap());
    let (_, discount) = send(&app, get(&uri).to_request()).await;
    assert_eq!(discount["max_uses"], 4);

    // Invoicing runs in the background.
    let uri = format!("/orders/{}/invoice", order["id"].as_str().unwrap());
    let mut answer = send(&app, get(&uri).to_request()).await;
    for _ in 0..100 {
        if answer.0 == StatusCode::OK {
            break;
        }
        actix_web::rt::time::sleep(Duration::from_millis(10)).await;
        answer = send(&app, get(&uri).to_request()).await;
    }
    let (status, invoice) = answer;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(invoice["amount"], "225.00");
}

#[actix_web::test]
async fn discount_failures_map_to_404_and_422() {
    let state = new_state();
    let app = shop_app!(state);
    let (user_id, hose_id) = seed(&state);
    let (status, _) = send(
        &app,
        post(
            "/discounts",
            json!({ "code": "BIG", "discount_type": "FIXED", "value": "10", "min_order_amount": "500" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let order = |code: &str| {
        post(
            "/orders",
            json!({
                "user_id": user_id,
                "payment_method": "COD",
                "discount_code": code,
                "items": [{ "product_id": hose_id, "quantity": 1 }]
            }),
        )
    };

    let (status, body) = send(&app, order("NOPE").to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "{body}");

    let (status, body) = send(&app, order("BIG").to_request()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
    assert!(body["error"].as_str().unwrap().contains("500"));

    let (_, orders) = send(&app, get("/orders").to_request()).await;
    assert_eq!(orders["total"], 0);
}

#[actix_web::test]
async fn lookups_and_validation_use_the_right_status_codes() {
    let state = new_state();
    let app = shop_app!(state);
    let (user_id, _) = seed(&state);

    let (status, body) = send(&app, get(&format!("/orders/{}", Uuid::new_v4())).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("Order not found"));

    let (status, _) = send(
        &app,
        post("/users", json!({ "username": "amy", "email": "other@example.com" })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        post(
            "/orders",
            json!({ "user_id": user_id, "payment_method": "COD", "items": [] }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        post(
            "/products",
            json!({ "name": "Rake", "price": "cheap", "category_id": Uuid::new_v4() }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn delivered_orders_cannot_be_cancelled() {
    let state = new_state();
    let app = shop_app!(state);
    let (user_id, hose_id) = seed(&state);
    let (_, order) = send(
        &app,
        post(
            "/orders",
            json!({
                "user_id": user_id,
                "payment_method": "COD",
                "items": [{ "product_id": hose_id, "quantity": 1 }]
            }),
        )
        .to_request(),
    )
    .await;
    let id = order["id"].as_str().unwrap();

    let (status, delivered) = send(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/orders/{id}/status"))
            .set_json(json!({ "status": "DELIVERED" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(delivered["status"], "DELIVERED");

    let (status, _) = send(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/orders/{id}/cancel"))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn checkout_turns_the_cart_into_an_order_and_empties_it() {
    let state = new_state();
    let app = shop_app!(state);
    let (user_id, hose_id) = seed(&state);

    let (status, cart) = send(&app, post("/carts", json!({ "user_id": user_id })).to_request()).await;
    assert_eq!(status, StatusCode::CREATED);
    let cart_id = cart["id"].as_str().unwrap();
    for _ in 0..2 {
        let (status, _) = send(
            &app,
            post(
                &format!("/carts/{cart_id}/items"),
                json!({ "product_id": hose_id, "quantity": 1 }),
            )
            .to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, cart) = send(&app, get(&format!("/carts/{cart_id}")).to_request()).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["total_quantity"], 2);
    assert_eq!(cart["total_price"], "250.00");

    let checkout_uri = format!("/carts/user/{user_id}/checkout");
    let (status, order) = send(
        &app,
        post(&checkout_uri, json!({ "payment_method": "BANK_TRANSFER" })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["final_price"], "250.00");

    let (_, cart) = send(&app, get(&format!("/carts/user/{user_id}")).to_request()).await;
    assert!(cart["items"].as_array().unwrap().is_empty());

    let (status, _) = send(
        &app,
        post(&checkout_uri, json!({ "payment_method": "BANK_TRANSFER" })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn category_tree_nests_children_and_rejects_cycles() {
    let state = new_state();
    let app = shop_app!(state);
    let (_, home) = send(&app, post("/categories", json!({ "name": "Home" })).to_request()).await;
    let (_, kitchen) = send(
        &app,
        post("/categories", json!({ "name": "Kitchen", "parent_id": home["id"] })).to_request(),
    )
    .await;

    let (_, tree) = send(&app, get("/categories/tree").to_request()).await;
    assert_eq!(tree[0]["name"], "Home");
    assert_eq!(tree[0]["children"][0]["name"], "Kitchen");

    let (status, _) = send(
        &app,
        test::TestRequest::put()
            .uri(&format!("/categories/{}", home["id"].as_str().unwrap()))
            .set_json(json!({ "name": "Home", "parent_id": kitchen["id"] }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn lists_are_paginated_with_clamped_limits() {
    let state = new_state();
    let app = shop_app!(state);
    for name in ["a", "b", "c"] {
        let (status, _) = send(
            &app,
            post(
                "/users",
                json!({ "username": name, "email": format!("{name}@example.com") }),
            )
            .to_request(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, page) = send(&app, get("/users?page=2&limit=2").to_request()).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["page"], 2);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["items"][0]["username"], "c");

    let (_, page) = send(&app, get("/users?limit=1000").to_request()).await;
    assert_eq!(page["limit"], 100);
}

#[actix_web::test]
async fn absurd_page_numbers_return_an_empty_page() {
    let state = new_state();
    let app = shop_app!(state);
    seed(&state);

    let (status, page) = send(&app, get("/users?page=9223372036854775807").to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page["items"].as_array().unwrap().is_empty());
    assert_eq!(page["total"], 1);

    let (status, page) = send(&app, get("/users").to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["items"][0]["username"], "amy");
}
