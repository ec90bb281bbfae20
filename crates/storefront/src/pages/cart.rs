//! Cart page and cart line actions.
//!
//! Quantity changes are clamped here, at the call site: increment stops at
//! the stock recorded when the product was added, decrement stops at 1.

use askama::Template;
use kube_ec_core::ProductId;
use tracing::instrument;

use super::{Page, Route, clamp_quantity, format_price};
use crate::error::AppError;
use crate::state::AppState;
use crate::stores::{CartItem, CartStore};

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub stock: u32,
    pub line_total: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        let currency = &item.product.price.currency;
        Self {
            id: item.product.id.to_string(),
            name: item.product.name.clone(),
            unit_price: format_price(item.product.price.amount, currency),
            quantity: item.quantity,
            stock: item.product.stock_quantity,
            line_total: format_price(item.line_total(), currency),
        }
    }
}

/// Cart page.
#[derive(Debug, Clone, Template)]
#[template(path = "cart/show.txt")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub shipping: String,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    /// Build the view from the cart store. Shipping is always free.
    #[must_use]
    pub fn from_store(cart: &dyn CartStore) -> Self {
        let total = format_price(cart.total_price(), cart_currency(cart));
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: total.clone(),
            shipping: "Free".to_string(),
            total,
            item_count: cart.total_items(),
        }
    }
}

/// Currency of the cart; every line is assumed to share the first one's.
pub(super) fn cart_currency(cart: &dyn CartStore) -> &str {
    cart.items()
        .first()
        .map_or("", |item| item.product.price.currency.as_str())
}

// =============================================================================
// Controllers
// =============================================================================

/// Show the cart.
#[must_use]
pub fn show(state: &AppState) -> Page<CartView> {
    Page::Render(CartView::from_store(state.cart()))
}

/// Add one unit, up to the product's stock.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the product is not in the cart, or a
/// storage error if the cart cannot be saved.
#[instrument(skip(state))]
pub fn increment(state: &mut AppState, id: &ProductId) -> Result<Page<CartView>, AppError> {
    let (quantity, stock) = line(state, id)?;
    let next = quantity.saturating_add(1).min(stock).max(1);
    state.cart_mut().update_quantity(id, next)?;
    Ok(show(state))
}

/// Remove one unit, never going below 1.
///
/// # Errors
///
/// Same as [`increment`].
#[instrument(skip(state))]
pub fn decrement(state: &mut AppState, id: &ProductId) -> Result<Page<CartView>, AppError> {
    let (quantity, _) = line(state, id)?;
    let next = quantity.saturating_sub(1).max(1);
    state.cart_mut().update_quantity(id, next)?;
    Ok(show(state))
}

/// Set a line's quantity, clamped into `1..=stock`.
///
/// # Errors
///
/// Same as [`increment`].
#[instrument(skip(state))]
pub fn set_quantity(
    state: &mut AppState,
    id: &ProductId,
    quantity: u32,
) -> Result<Page<CartView>, AppError> {
    let (_, stock) = line(state, id)?;
    state
        .cart_mut()
        .update_quantity(id, clamp_quantity(quantity, stock))?;
    Ok(show(state))
}

/// Remove a line. Removing a product that is not in the cart is a no-op.
///
/// # Errors
///
/// Returns a storage error if the cart cannot be saved.
#[instrument(skip(state))]
pub fn remove(state: &mut AppState, id: &ProductId) -> Result<Page<CartView>, AppError> {
    state.cart_mut().remove_item(id)?;
    Ok(show(state))
}

/// Empty the cart.
///
/// # Errors
///
/// Returns a storage error if the cart cannot be saved.
#[instrument(skip(state))]
pub fn clear(state: &mut AppState) -> Result<Page<CartView>, AppError> {
    state.cart_mut().clear_cart()?;
    Ok(show(state))
}

/// Proceed to checkout: signed-out users go to login first.
#[must_use]
pub fn checkout(state: &AppState) -> Page<CartView> {
    if state.session().is_authenticated() {
        Page::Redirect(Route::Checkout)
    } else {
        Page::Redirect(Route::Login)
    }
}

/// Current quantity and recorded stock of a cart line.
fn line(state: &AppState, id: &ProductId) -> Result<(u32, u32), AppError> {
    state
        .cart()
        .get(id)
        .map(|item| (item.quantity, item.product.stock_quantity))
        .ok_or_else(|| AppError::NotFound(format!("Product {id} is not in your cart")))
}
