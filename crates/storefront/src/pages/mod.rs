//! Page controllers.
//!
//! Each controller reads the stores it needs, checks its preconditions, calls
//! the API, and returns a [`Page`]: a view model to render, a redirect, or
//! nothing when a newer request superseded this one. View models are askama
//! templates over pre-formatted strings.
//!
//! Controllers that only read take `&AppState`; controllers that change the
//! session or cart take `&mut AppState` and return `Result<Page<_>, AppError>`
//! so a failed durable write is never silent. Backend failures are shown
//! inline in the returned view.

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod header;
pub mod orders;
pub mod products;

use std::fmt;

use kube_ec_core::{Money, ProductId};

use crate::api::{AccessToken, User};
use crate::state::AppState;

/// Outcome of a page controller.
#[derive(Debug)]
pub enum Page<V> {
    /// Render this view.
    Render(V),
    /// Navigate elsewhere instead of rendering.
    Redirect(Route),
    /// A newer request replaced this one; render nothing.
    Superseded,
}

impl<V> Page<V> {
    /// The view, if this outcome renders one.
    pub fn into_view(self) -> Option<V> {
        match self {
            Self::Render(view) => Some(view),
            Self::Redirect(_) | Self::Superseded => None,
        }
    }

    /// The redirect target, if this outcome navigates.
    #[must_use]
    pub const fn redirect(&self) -> Option<&Route> {
        match self {
            Self::Redirect(route) => Some(route),
            Self::Render(_) | Self::Superseded => None,
        }
    }
}

/// Navigable pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Products,
    Product(ProductId),
    Cart,
    Checkout,
    Orders,
    Account,
    Login,
    Register,
}

impl Route {
    /// URL-style path of the page.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Products => "/products".to_string(),
            Self::Product(id) => format!("/products/{id}"),
            Self::Cart => "/cart".to_string(),
            Self::Checkout => "/checkout".to_string(),
            Self::Orders => "/orders".to_string(),
            Self::Account => "/account".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// =============================================================================
// Shared Helpers
// =============================================================================

/// Credentials of the signed-in user, copied out of the session so the
/// caller can keep using `&mut AppState`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: User,
    pub token: AccessToken,
}

/// Require a signed-in user, or name the page to send them to instead.
///
/// # Errors
///
/// Returns `Route::Login` when no user is signed in.
pub fn require_auth(state: &AppState) -> Result<Credentials, Route> {
    state
        .session()
        .credentials()
        .map(|(user, token)| Credentials {
            user: user.clone(),
            token: token.clone(),
        })
        .ok_or(Route::Login)
}

/// Clamp a requested quantity into `1..=stock`.
///
/// A product with no stock still clamps to 1; callers reject out-of-stock
/// products before adding them.
#[must_use]
pub fn clamp_quantity(requested: u32, stock: u32) -> u32 {
    requested.clamp(1, stock.max(1))
}

/// Format an amount in the given currency for display.
fn format_price(amount: i64, currency: &str) -> String {
    Money::new(currency, amount).to_string()
}
