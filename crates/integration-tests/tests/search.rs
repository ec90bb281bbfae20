//! Superseded product searches never overwrite newer results.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use httpmock::prelude::*;
use kube_ec_integration_tests::TestContext;
use kube_ec_storefront::api::ProductQuery;
use kube_ec_storefront::pages::{Page, products};
use serde_json::json;

fn search(term: &str) -> ProductQuery {
    ProductQuery {
        search: Some(term.to_string()),
        ..ProductQuery::new(20)
    }
}

#[tokio::test]
async fn test_slow_search_is_superseded_by_newer_one() {
    let ctx = TestContext::new().await;
    ctx.server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/products")
                .query_param("search", "tea");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({ "products": [{ "id": "p1", "name": "Teacup" }] }));
        })
        .await;
    ctx.server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/products")
                .query_param("search", "teapot");
            then.status(200)
                .json_body(json!({ "products": [{ "id": "p2", "name": "Teapot" }] }));
        })
        .await;
    let state = ctx.start().unwrap();

    let (stale, fresh) = tokio::join!(products::index(&state, search("tea")), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        products::index(&state, search("teapot")).await
    });

    assert!(matches!(stale, Page::Superseded));
    let view = fresh.into_view().unwrap();
    assert_eq!(view.products.len(), 1);
    assert_eq!(view.products[0].name, "Teapot");
}
