//! Login, cart, checkout and order history against a mock gateway.

#![allow(clippy::unwrap_used)]

use httpmock::prelude::*;
use kube_ec_core::{PaymentMethod, ProductId};
use kube_ec_integration_tests::TestContext;
use kube_ec_storefront::api::Address;
use kube_ec_storefront::pages::auth::{self, LoginForm};
use kube_ec_storefront::pages::checkout::{self, CheckoutForm};
use kube_ec_storefront::pages::{Route, cart, orders, products};
use secrecy::SecretString;
use serde_json::json;

async fn mock_catalog(ctx: &TestContext) {
    ctx.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/products/p1");
            then.status(200).json_body(json!({
                "id": "p1",
                "name": "Cast Iron Teapot",
                "price": { "currency": "JPY", "amount": 1000 },
                "stock_quantity": 5,
                "is_active": true
            }));
        })
        .await;
}

async fn mock_login(ctx: &TestContext) {
    ctx.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/auth/login");
            then.status(200).json_body(json!({
                "user": { "id": "u1", "email": "aiko@example.com", "name": "Aiko" },
                "access_token": "tok",
                "refresh_token": "refresh"
            }));
        })
        .await;
}

fn login_form() -> LoginForm {
    LoginForm {
        email: "aiko@example.com".to_string(),
        password: SecretString::from("pw".to_string()),
    }
}

#[tokio::test]
async fn test_login_add_checkout_and_view_orders() {
    let ctx = TestContext::new().await;
    mock_catalog(&ctx).await;
    mock_login(&ctx).await;

    let create_order = ctx
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/orders")
                .header("authorization", "Bearer tok")
                .body_includes(r#""product_id":"p1""#)
                .body_includes(r#""quantity":4"#);
            then.status(201).json_body(json!({
                "id": "o1",
                "user_id": "u1",
                "total_amount": { "currency": "JPY", "amount": 4000 },
                "status": "ORDER_STATUS_PENDING"
            }));
        })
        .await;
    ctx.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/payments");
            then.status(201).json_body(json!({ "id": "pay-1", "order_id": "o1" }));
        })
        .await;
    ctx.server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/payments/process")
                .body_includes(r#""payment_token":"tok_visa""#);
            then.status(200).json_body(json!({
                "success": true,
                "transaction_id": "txn_1",
                "message": "ok"
            }));
        })
        .await;
    ctx.server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/orders")
                .query_param("user_id", "u1");
            then.status(200).json_body(json!({
                "orders": [{
                    "id": "o1",
                    "items": [{ "product_id": "p1", "product_name": "Cast Iron Teapot",
                                "quantity": 4,
                                "subtotal": { "currency": "JPY", "amount": 4000 } }],
                    "total_amount": { "currency": "JPY", "amount": 4000 },
                    "status": 2
                }],
                "pagination": { "total_count": 1, "total_pages": 1, "current_page": 1 }
            }));
        })
        .await;

    let mut state = ctx.start().unwrap();
    let id = ProductId::new("p1");

    // Adding the same product twice accumulates
    products::add_to_cart(&mut state, &id, 2).await.unwrap();
    products::add_to_cart(&mut state, &id, 2).await.unwrap();
    assert_eq!(state.cart().total_items(), 4);
    assert_eq!(state.cart().total_price(), 4000);

    assert_eq!(cart::checkout(&state).redirect(), Some(&Route::Login));

    let page = auth::login(&mut state, login_form()).await.unwrap();
    assert_eq!(page.redirect(), Some(&Route::Home));
    assert_eq!(cart::checkout(&state).redirect(), Some(&Route::Checkout));

    let form = CheckoutForm {
        shipping_address: Address {
            postal_code: "150-0001".to_string(),
            prefecture: "Tokyo".to_string(),
            city: "Shibuya".to_string(),
            address_line1: "1-2-3 Jingumae".to_string(),
            ..Address::default()
        },
        payment_method: PaymentMethod::CreditCard,
        payment_token: SecretString::from("tok_visa".to_string()),
    };
    let confirmation = checkout::submit(&mut state, form)
        .await
        .unwrap()
        .into_view()
        .unwrap();

    create_order.assert_async().await;
    assert_eq!(confirmation.order_id, "o1");
    assert_eq!(confirmation.total, "¥4,000");
    assert!(state.cart().is_empty());

    let history = orders::index(&state, 1).await.into_view().unwrap();
    assert_eq!(history.orders.len(), 1);
    assert_eq!(history.orders[0].status, "Confirmed");
    assert_eq!(history.orders[0].total, "¥4,000");
}

#[tokio::test]
async fn test_buy_now_requires_login() {
    let ctx = TestContext::new().await;
    mock_catalog(&ctx).await;
    mock_login(&ctx).await;
    let mut state = ctx.start().unwrap();
    let id = ProductId::new("p1");

    let page = products::buy_now(&mut state, &id, 1).await.unwrap();
    assert_eq!(page.redirect(), Some(&Route::Login));
    assert!(state.cart().is_empty());

    auth::login(&mut state, login_form()).await.unwrap();
    let page = products::buy_now(&mut state, &id, 9).await.unwrap();

    assert_eq!(page.redirect(), Some(&Route::Cart));
    // Clamped to the 5 in stock
    assert_eq!(state.cart().total_items(), 5);
}

#[tokio::test]
async fn test_logout_then_orders_redirects_to_login() {
    let ctx = TestContext::new().await;
    mock_login(&ctx).await;
    let mut state = ctx.start().unwrap();

    auth::login(&mut state, login_form()).await.unwrap();
    assert!(ctx.data_dir().join("auth-storage.json").exists());

    assert_eq!(auth::logout(&mut state).unwrap(), Route::Home);

    assert!(!ctx.data_dir().join("auth-storage.json").exists());
    assert_eq!(orders::index(&state, 1).await.redirect(), Some(&Route::Login));
}
