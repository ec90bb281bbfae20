//! Session and cart surviving a restart over the same data directory.

#![allow(clippy::unwrap_used)]

use httpmock::prelude::*;
use kube_ec_core::ProductId;
use kube_ec_integration_tests::TestContext;
use kube_ec_storefront::pages::auth::{self, LoginForm};
use kube_ec_storefront::pages::{cart, header, products};
use secrecy::SecretString;
use serde_json::json;

#[tokio::test]
async fn test_session_and_cart_survive_restart() {
    let ctx = TestContext::new().await;
    ctx.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/auth/login");
            then.status(200).json_body(json!({
                "user": { "id": "u1", "email": "aiko@example.com", "name": "Aiko" },
                "access_token": "tok"
            }));
        })
        .await;
    ctx.server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/products/p1");
            then.status(200).json_body(json!({
                "id": "p1", "name": "Teapot",
                "price": { "currency": "JPY", "amount": 1000 },
                "stock_quantity": 5
            }));
        })
        .await;

    {
        let mut state = ctx.start().unwrap();
        let form = LoginForm {
            email: "aiko@example.com".to_string(),
            password: SecretString::from("pw".to_string()),
        };
        auth::login(&mut state, form).await.unwrap();
        products::add_to_cart(&mut state, &ProductId::new("p1"), 3)
            .await
            .unwrap();
    }

    let state = ctx.start().unwrap();

    assert_eq!(state.session().user().unwrap().name, "Aiko");
    assert_eq!(state.session().access_token().unwrap().expose(), "tok");
    assert_eq!(state.cart().total_items(), 3);

    let badge = header::view(&state);
    assert_eq!(badge.user_name.as_deref(), Some("Aiko"));
    assert_eq!(badge.cart_count, 3);

    let view = cart::show(&state).into_view().unwrap();
    assert_eq!(view.total, "¥3,000");
}

#[tokio::test]
async fn test_cart_survives_logout() {
    let ctx = TestContext::new().await;
    {
        let mut state = ctx.start().unwrap();
        state
            .session_mut()
            .set_auth(
                kube_ec_storefront::api::User::default(),
                kube_ec_storefront::api::AccessToken::new("tok"),
            )
            .unwrap();
        state
            .cart_mut()
            .add_item(kube_ec_storefront::api::Product::default(), 2)
            .unwrap();
        auth::logout(&mut state).unwrap();
    }

    let state = ctx.start().unwrap();

    assert!(!state.session().is_authenticated());
    assert_eq!(state.cart().total_items(), 2);
}

#[tokio::test]
async fn test_corrupt_records_start_empty() {
    let ctx = TestContext::new().await;
    std::fs::write(ctx.data_dir().join("auth-storage.json"), "{not json").unwrap();
    std::fs::write(ctx.data_dir().join("cart-storage.json"), "[1, 2").unwrap();

    let state = ctx.start().unwrap();

    assert!(!state.session().is_authenticated());
    assert!(state.cart().is_empty());
}
