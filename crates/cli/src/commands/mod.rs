//! Subcommand handlers.
//!
//! Each handler calls one page controller and prints the outcome: the header
//! and the rendered page, or a hint naming the command for the page the
//! controller redirected to.

pub mod account;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod session;

use askama::Template;
use kube_ec_storefront::error::AppError;
use kube_ec_storefront::pages::{Page, Route, header};
use kube_ec_storefront::state::AppState;
use thiserror::Error;

/// Errors that can occur while running a subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A page controller failed.
    #[error("{}", .0.user_message())]
    App(#[from] AppError),

    /// A view failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// The command needs confirmation it was not given.
    #[error("{0}")]
    NotConfirmed(&'static str),
}

/// Print the header and the controller's outcome.
#[allow(clippy::print_stdout)]
pub fn emit<V: Template>(state: &AppState, page: Page<V>) -> Result<(), CommandError> {
    println!("{}", header::view(state).render()?);
    println!();

    match page {
        Page::Render(view) => println!("{}", view.render()?),
        Page::Redirect(route) => println!("→ {route}  (run `{}`)", command_for(&route)),
        Page::Superseded => tracing::debug!("Request superseded; nothing to show"),
    }
    Ok(())
}

/// Print a redirect for controllers that only navigate.
pub fn emit_redirect(state: &AppState, route: Route) -> Result<(), CommandError> {
    emit::<header::HeaderView>(state, Page::Redirect(route))
}

/// The subcommand that shows a route's page.
fn command_for(route: &Route) -> String {
    match route {
        Route::Home | Route::Products => "kube-ec products list".to_string(),
        Route::Product(id) => format!("kube-ec products show {id}"),
        Route::Cart => "kube-ec cart show".to_string(),
        Route::Checkout => "kube-ec checkout show".to_string(),
        Route::Orders => "kube-ec orders list".to_string(),
        Route::Account => "kube-ec account show".to_string(),
        Route::Login => "kube-ec login --email <EMAIL>".to_string(),
        Route::Register => "kube-ec register --name <NAME> --email <EMAIL>".to_string(),
    }
}
