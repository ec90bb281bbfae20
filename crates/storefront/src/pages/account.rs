//! Account page: profile display, profile update and account deletion.

use askama::Template;
use tracing::instrument;

use super::{Credentials, Page, Route, require_auth};
use crate::api::{UpdateUserRequest, User};
use crate::error::AppError;
use crate::state::AppState;

/// Account page.
#[derive(Debug, Clone, Template)]
#[template(path = "account/show.txt")]
pub struct AccountView {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl AccountView {
    fn new(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
            notice: None,
            error: None,
        }
    }
}

/// Show the profile as the backend has it.
///
/// If the fetch fails the session's copy is shown with the error.
#[instrument(skip(state))]
pub async fn show(state: &AppState) -> Page<AccountView> {
    let Credentials { user, token } = match require_auth(state) {
        Ok(credentials) => credentials,
        Err(route) => return Page::Redirect(route),
    };

    match state.api().get_user(&user.id, &token).await {
        Ok(fresh) => Page::Render(AccountView::new(&fresh)),
        Err(e) => {
            let err = AppError::from(e);
            err.log();
            Page::Render(AccountView {
                error: Some(err.user_message()),
                ..AccountView::new(&user)
            })
        }
    }
}

/// Update name and/or phone number, then refresh the session's user.
///
/// # Errors
///
/// Returns `AppError::Validation` when nothing would change, the API error
/// if the backend rejects the update, or a storage error if the session
/// cannot be saved.
#[instrument(skip(state, request))]
pub async fn update(
    state: &mut AppState,
    request: UpdateUserRequest,
) -> Result<Page<AccountView>, AppError> {
    let Credentials { user, token } = match require_auth(state) {
        Ok(credentials) => credentials,
        Err(route) => return Ok(Page::Redirect(route)),
    };

    let request = UpdateUserRequest {
        name: request.name.map(|name| name.trim().to_string()),
        phone_number: request.phone_number.map(|phone| phone.trim().to_string()),
    };
    if request.is_empty() {
        return Err(AppError::Validation("Nothing to update".to_string()));
    }
    if request.name.as_deref() == Some("") {
        return Err(AppError::Validation("Name cannot be empty".to_string()));
    }

    let updated = state.api().update_user(&user.id, &request, &token).await?;
    state.session_mut().set_user(updated.clone())?;

    Ok(Page::Render(AccountView {
        notice: Some("Profile updated".to_string()),
        ..AccountView::new(&updated)
    }))
}

/// Delete the account, then sign out locally.
///
/// # Errors
///
/// Returns the API error if the request fails, `AppError::Validation` if
/// the backend reports the deletion did not happen, or a storage error if
/// the session cannot be cleared.
#[instrument(skip(state))]
pub async fn delete(state: &mut AppState) -> Result<Page<AccountView>, AppError> {
    let Credentials { user, token } = match require_auth(state) {
        Ok(credentials) => credentials,
        Err(route) => return Ok(Page::Redirect(route)),
    };

    if !state.api().delete_user(&user.id, &token).await? {
        return Err(AppError::Validation(
            "The account could not be deleted".to_string(),
        ));
    }

    state.session_mut().logout()?;
    tracing::info!(user_id = %user.id, "Account deleted");
    Ok(Page::Redirect(Route::Home))
}
