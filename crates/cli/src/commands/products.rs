//! Catalog commands.

use kube_ec_core::ProductId;
use kube_ec_storefront::api::ProductQuery;
use kube_ec_storefront::pages::products;
use kube_ec_storefront::state::AppState;

use super::{CommandError, emit};

/// List products, optionally filtered.
pub async fn list(
    state: &AppState,
    page: u32,
    page_size: Option<u32>,
    category: Option<String>,
    search: Option<String>,
) -> Result<(), CommandError> {
    let query = ProductQuery {
        page: page.max(1),
        category,
        search,
        ..ProductQuery::new(page_size.unwrap_or(state.config().page_size))
    };
    emit(state, products::index(state, query).await)
}

/// Show one product.
pub async fn show(state: &AppState, id: &ProductId) -> Result<(), CommandError> {
    emit(state, products::show(state, id).await)
}

/// Add a product to the cart.
pub async fn add(state: &mut AppState, id: &ProductId, quantity: u32) -> Result<(), CommandError> {
    let page = products::add_to_cart(state, id, quantity).await?;
    emit(state, page)
}

/// Add a product to the cart and go to the cart.
pub async fn buy(state: &mut AppState, id: &ProductId, quantity: u32) -> Result<(), CommandError> {
    let page = products::buy_now(state, id, quantity).await?;
    emit(state, page)
}
