//! Checkout: order placement and payment.
//!
//! Submitting checkout creates an order from the cart lines, creates a
//! payment for the order total and processes it. The cart is cleared only
//! once the payment succeeds. Stock is not re-validated before ordering.

use askama::Template;
use kube_ec_core::{Money, PaymentMethod};
use secrecy::SecretString;
use tracing::instrument;

use super::cart::{CartItemView, cart_currency};
use super::{Credentials, Page, Route, format_price, require_auth};
use crate::api::{
    Address, CreateOrderRequest, CreatePaymentRequest, OrderItem, ProcessPaymentRequest,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::stores::CartStore;

/// Checkout form input.
#[derive(Debug, Clone)]
pub struct CheckoutForm {
    pub shipping_address: Address,
    pub payment_method: PaymentMethod,
    /// Token from the payment provider, forwarded to the backend as-is.
    pub payment_token: SecretString,
}

/// Checkout review page.
#[derive(Debug, Clone, Template)]
#[template(path = "checkout/show.txt")]
pub struct CheckoutView {
    pub customer: String,
    pub items: Vec<CartItemView>,
    pub total: String,
}

/// Order confirmation page.
#[derive(Debug, Clone, Template)]
#[template(path = "checkout/complete.txt")]
pub struct OrderConfirmationView {
    pub order_id: String,
    pub status: String,
    pub total: String,
    pub transaction_id: String,
    pub ship_to: String,
}

impl CheckoutView {
    fn new(customer: &str, cart: &dyn CartStore) -> Self {
        Self {
            customer: customer.to_string(),
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: format_price(cart.total_price(), cart_currency(cart)),
        }
    }
}

// =============================================================================
// Controllers
// =============================================================================

/// Review the cart before paying. Requires a signed-in user and a
/// non-empty cart.
#[must_use]
pub fn show(state: &AppState) -> Page<CheckoutView> {
    match preconditions(state) {
        Ok(credentials) => Page::Render(CheckoutView::new(&credentials.user.name, state.cart())),
        Err(route) => Page::Redirect(route),
    }
}

/// Place the order and pay for it.
///
/// # Errors
///
/// Returns `AppError::Validation` for an incomplete address,
/// `AppError::PaymentDeclined` if the payment is refused, the API error if
/// any call fails, or a storage error if the cart cannot be cleared.
#[instrument(skip(state, form))]
pub async fn submit(
    state: &mut AppState,
    form: CheckoutForm,
) -> Result<Page<OrderConfirmationView>, AppError> {
    let Credentials { user, token } = match preconditions(state) {
        Ok(credentials) => credentials,
        Err(route) => return Ok(Page::Redirect(route)),
    };
    validate_address(&form.shipping_address)?;

    let items = order_items(state.cart());
    let cart_total = Money::new(cart_currency(state.cart()), state.cart().total_price());

    let order = state
        .api()
        .create_order(
            &CreateOrderRequest {
                user_id: user.id.clone(),
                items,
                shipping_address: form.shipping_address.clone(),
            },
            &token,
        )
        .await?;

    // The backend computes the total; fall back to the cart's when omitted
    let amount = if order.total_amount.amount > 0 {
        order.total_amount.clone()
    } else {
        cart_total
    };

    let payment = state
        .api()
        .create_payment(
            &CreatePaymentRequest {
                order_id: order.id.clone(),
                user_id: user.id.clone(),
                amount: amount.clone(),
                method: form.payment_method,
            },
            &token,
        )
        .await?;

    let result = state
        .api()
        .process_payment(
            &ProcessPaymentRequest {
                payment_id: payment.id.clone(),
                payment_token: form.payment_token,
            },
            &token,
        )
        .await?;

    if !result.success {
        return Err(AppError::PaymentDeclined(result.message));
    }

    state.cart_mut().clear_cart()?;
    tracing::info!(order_id = %order.id, "Checkout complete");

    Ok(Page::Render(OrderConfirmationView {
        order_id: order.id.to_string(),
        status: order.status.label().to_string(),
        total: amount.to_string(),
        transaction_id: result.transaction_id,
        ship_to: format_address(&form.shipping_address),
    }))
}

/// Signed-in credentials, or where to go when checkout is not possible yet.
fn preconditions(state: &AppState) -> Result<Credentials, Route> {
    let credentials = require_auth(state)?;
    if state.cart().is_empty() {
        return Err(Route::Cart);
    }
    Ok(credentials)
}

/// Order lines from the cart, priced at the cart's recorded unit prices.
fn order_items(cart: &dyn CartStore) -> Vec<OrderItem> {
    cart.items()
        .iter()
        .map(|item| OrderItem {
            product_id: item.product.id.clone(),
            product_name: item.product.name.clone(),
            quantity: item.quantity,
            unit_price: item.product.price.clone(),
            subtotal: item.product.price.times(item.quantity),
        })
        .collect()
}

// =============================================================================
// Address Validation
// =============================================================================

/// Check a shipping address before any request is sent.
///
/// Postal codes use the Japanese `NNN-NNNN` layout (hyphen optional).
///
/// # Errors
///
/// Returns `AppError::Validation` naming the first invalid field.
pub fn validate_address(address: &Address) -> Result<(), AppError> {
    if !is_postal_code(address.postal_code.trim()) {
        return Err(AppError::Validation(
            "Postal code must look like 123-4567".to_string(),
        ));
    }

    let required = [
        ("Prefecture", &address.prefecture),
        ("City", &address.city),
        ("Address line 1", &address.address_line1),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(AppError::Validation(format!("{field} is required")));
    }

    Ok(())
}

fn is_postal_code(code: &str) -> bool {
    let digits: String = code.chars().filter(|c| *c != '-').collect();
    let hyphen_ok = match code.find('-') {
        None => true,
        Some(pos) => pos == 3 && code.matches('-').count() == 1,
    };
    hyphen_ok && digits.len() == 7 && digits.chars().all(|c| c.is_ascii_digit())
}

fn format_address(address: &Address) -> String {
    let mut parts = vec![
        format!("〒{}", address.postal_code.trim()),
        address.prefecture.trim().to_string(),
        address.city.trim().to_string(),
        address.address_line1.trim().to_string(),
    ];
    if !address.address_line2.trim().is_empty() {
        parts.push(address.address_line2.trim().to_string());
    }
    parts.join(" ")
}
