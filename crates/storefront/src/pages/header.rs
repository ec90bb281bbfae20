//! Navigation header shown above every page.

use askama::Template;

use crate::state::AppState;

/// Header view: who is signed in and how many items are in the cart.
#[derive(Debug, Clone, Template)]
#[template(path = "header.txt")]
pub struct HeaderView {
    pub user_name: Option<String>,
    pub cart_count: u32,
}

/// Build the header from the current stores.
#[must_use]
pub fn view(state: &AppState) -> HeaderView {
    HeaderView {
        user_name: state.session().user().map(|user| user.name.clone()),
        cart_count: state.cart().total_items(),
    }
}
