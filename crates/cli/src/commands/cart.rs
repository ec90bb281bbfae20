//! Cart commands.

use kube_ec_core::ProductId;
use kube_ec_storefront::pages::cart;
use kube_ec_storefront::state::AppState;

use super::{CommandError, emit};

pub fn show(state: &AppState) -> Result<(), CommandError> {
    emit(state, cart::show(state))
}

pub fn increment(state: &mut AppState, id: &ProductId) -> Result<(), CommandError> {
    let page = cart::increment(state, id)?;
    emit(state, page)
}

pub fn decrement(state: &mut AppState, id: &ProductId) -> Result<(), CommandError> {
    let page = cart::decrement(state, id)?;
    emit(state, page)
}

pub fn set_quantity(state: &mut AppState, id: &ProductId, quantity: u32) -> Result<(), CommandError> {
    let page = cart::set_quantity(state, id, quantity)?;
    emit(state, page)
}

pub fn remove(state: &mut AppState, id: &ProductId) -> Result<(), CommandError> {
    let page = cart::remove(state, id)?;
    emit(state, page)
}

pub fn clear(state: &mut AppState) -> Result<(), CommandError> {
    let page = cart::clear(state)?;
    emit(state, page)
}

pub fn checkout(state: &AppState) -> Result<(), CommandError> {
    emit(state, cart::checkout(state))
}
