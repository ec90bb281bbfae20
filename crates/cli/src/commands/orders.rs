//! Order history commands.

use kube_ec_core::OrderId;
use kube_ec_storefront::pages::orders;
use kube_ec_storefront::state::AppState;

use super::{CommandError, emit};

pub async fn list(state: &AppState, page: u32) -> Result<(), CommandError> {
    emit(state, orders::index(state, page).await)
}

pub async fn show(state: &AppState, id: &OrderId) -> Result<(), CommandError> {
    emit(state, orders::show(state, id).await)
}
