//! Login, registration and logout commands.

use kube_ec_storefront::pages::auth::{self, LoginForm, RegisterForm};
use kube_ec_storefront::state::AppState;
use secrecy::SecretString;

use super::{CommandError, emit, emit_redirect};

pub async fn login(state: &mut AppState, email: String, password: String) -> Result<(), CommandError> {
    let form = LoginForm {
        email,
        password: SecretString::from(password),
    };
    let page = auth::login(state, form).await?;
    emit(state, page)
}

pub async fn register(
    state: &mut AppState,
    name: String,
    email: String,
    password: String,
    password_confirm: String,
    phone_number: Option<String>,
) -> Result<(), CommandError> {
    let form = RegisterForm {
        name,
        email,
        password: SecretString::from(password),
        password_confirm: SecretString::from(password_confirm),
        phone_number,
    };
    let page = auth::register(state, form).await?;
    emit(state, page)
}

pub fn logout(state: &mut AppState) -> Result<(), CommandError> {
    let route = auth::logout(state)?;
    emit_redirect(state, route)
}
