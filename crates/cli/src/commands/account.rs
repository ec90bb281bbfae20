//! Profile commands.

use kube_ec_storefront::api::UpdateUserRequest;
use kube_ec_storefront::pages::account;
use kube_ec_storefront::state::AppState;

use super::{CommandError, emit};

pub async fn show(state: &AppState) -> Result<(), CommandError> {
    emit(state, account::show(state).await)
}

pub async fn update(
    state: &mut AppState,
    name: Option<String>,
    phone_number: Option<String>,
) -> Result<(), CommandError> {
    let request = UpdateUserRequest { name, phone_number };
    let page = account::update(state, request).await?;
    emit(state, page)
}

/// Delete the account. Refuses to run without `--yes`.
pub async fn delete(state: &mut AppState, confirmed: bool) -> Result<(), CommandError> {
    if !confirmed {
        return Err(CommandError::NotConfirmed(
            "Deleting an account cannot be undone; pass --yes to confirm",
        ));
    }
    let page = account::delete(state).await?;
    emit(state, page)
}
