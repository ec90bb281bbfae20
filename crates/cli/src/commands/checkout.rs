//! Checkout commands.

use kube_ec_core::PaymentMethod;
use kube_ec_storefront::api::Address;
use kube_ec_storefront::pages::checkout::{self, CheckoutForm};
use kube_ec_storefront::state::AppState;
use secrecy::SecretString;

use super::{CommandError, emit};

/// Shipping address flags.
pub struct AddressArgs {
    pub postal_code: String,
    pub prefecture: String,
    pub city: String,
    pub line1: String,
    pub line2: String,
    pub phone: String,
}

impl From<AddressArgs> for Address {
    fn from(args: AddressArgs) -> Self {
        Self {
            postal_code: args.postal_code,
            prefecture: args.prefecture,
            city: args.city,
            address_line1: args.line1,
            address_line2: args.line2,
            phone_number: args.phone,
        }
    }
}

pub fn show(state: &AppState) -> Result<(), CommandError> {
    emit(state, checkout::show(state))
}

/// Place the order and pay for it.
pub async fn submit(
    state: &mut AppState,
    address: AddressArgs,
    method: PaymentMethod,
    payment_token: String,
) -> Result<(), CommandError> {
    let form = CheckoutForm {
        shipping_address: address.into(),
        payment_method: method,
        payment_token: SecretString::from(payment_token),
    };
    let page = checkout::submit(state, form).await?;
    emit(state, page)
}
