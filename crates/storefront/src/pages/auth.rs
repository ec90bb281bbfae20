//! Login, registration and logout.
//!
//! Form checks run before any request is sent. Backend rejections and form
//! errors are rendered inline on the form; only a failed session write is
//! returned as an error.

use askama::Template;
use kube_ec_core::Email;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::{Page, Route};
use crate::api::{AuthResponse, RegisterRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Login form page.
#[derive(Debug, Clone, Default, Template)]
#[template(path = "auth/login.txt")]
pub struct LoginView {
    pub email: String,
    pub error: Option<String>,
}

/// Registration form page.
#[derive(Debug, Clone, Default, Template)]
#[template(path = "auth/register.txt")]
pub struct RegisterView {
    pub name: String,
    pub email: String,
    pub error: Option<String>,
}

/// Login form input.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

/// Registration form input.
#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub password_confirm: SecretString,
    pub phone_number: Option<String>,
}

/// Empty login form. Signed-in users go home.
#[must_use]
pub fn login_page(state: &AppState) -> Page<LoginView> {
    if state.session().is_authenticated() {
        Page::Redirect(Route::Home)
    } else {
        Page::Render(LoginView::default())
    }
}

/// Empty registration form. Signed-in users go home.
#[must_use]
pub fn register_page(state: &AppState) -> Page<RegisterView> {
    if state.session().is_authenticated() {
        Page::Redirect(Route::Home)
    } else {
        Page::Render(RegisterView::default())
    }
}

/// Sign in and go home.
///
/// # Errors
///
/// Returns a storage error if the session cannot be saved. Every other
/// failure is rendered on the form.
#[instrument(skip(state, form))]
pub async fn login(state: &mut AppState, form: LoginForm) -> Result<Page<LoginView>, AppError> {
    let rejected = |err: AppError| {
        err.log();
        Ok(Page::Render(LoginView {
            email: form.email.trim().to_string(),
            error: Some(err.user_message()),
        }))
    };

    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => return rejected(e.into()),
    };
    if form.password.expose_secret().is_empty() {
        return rejected(AppError::Validation("Password is required".to_string()));
    }

    match state
        .api()
        .login(email.as_str(), form.password.clone())
        .await
    {
        Ok(auth) => match sign_in(state, auth) {
            Ok(()) => Ok(Page::Redirect(Route::Home)),
            Err(AppError::Storage(e)) => Err(e.into()),
            Err(e) => rejected(e),
        },
        Err(e) => rejected(e.into()),
    }
}

/// Create an account, sign in and go home.
///
/// # Errors
///
/// Same as [`login`].
#[instrument(skip(state, form))]
pub async fn register(
    state: &mut AppState,
    form: RegisterForm,
) -> Result<Page<RegisterView>, AppError> {
    let name = form.name.trim().to_string();
    let rejected = |err: AppError| {
        err.log();
        Ok(Page::Render(RegisterView {
            name: name.clone(),
            email: form.email.trim().to_string(),
            error: Some(err.user_message()),
        }))
    };

    if name.is_empty() {
        return rejected(AppError::Validation("Name is required".to_string()));
    }
    let email = match Email::parse(&form.email) {
        Ok(email) => email,
        Err(e) => return rejected(e.into()),
    };
    if form.password.expose_secret().is_empty() {
        return rejected(AppError::Validation("Password is required".to_string()));
    }
    if form.password.expose_secret() != form.password_confirm.expose_secret() {
        return rejected(AppError::Validation("Passwords do not match".to_string()));
    }

    let request = RegisterRequest {
        email: email.into_inner(),
        password: form.password.clone(),
        name: name.clone(),
        phone_number: form
            .phone_number
            .as_deref()
            .map(str::trim)
            .filter(|phone| !phone.is_empty())
            .map(str::to_string),
    };

    match state.api().register(&request).await {
        Ok(auth) => match sign_in(state, auth) {
            Ok(()) => Ok(Page::Redirect(Route::Home)),
            Err(AppError::Storage(e)) => Err(e.into()),
            Err(e) => rejected(e),
        },
        Err(e) => rejected(e.into()),
    }
}

/// Sign out locally. The backend is not told.
///
/// # Errors
///
/// Returns a storage error if the durable session record cannot be removed.
#[instrument(skip(state))]
pub fn logout(state: &mut AppState) -> Result<Route, AppError> {
    state.session_mut().logout()?;
    tracing::info!("Logged out");
    Ok(Route::Home)
}

/// Start the session from a login or registration response.
///
/// A response without a user id or token cannot back a session and is
/// rejected before anything is stored.
fn sign_in(state: &mut AppState, auth: AuthResponse) -> Result<(), AppError> {
    if auth.user.id.as_str().is_empty() || auth.access_token.is_empty() {
        return Err(AppError::Validation(
            "The server sent an incomplete sign-in response.".to_string(),
        ));
    }
    state.session_mut().set_auth(auth.user, auth.access_token)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::config::{ApiConfig, StorefrontConfig};
    use crate::storage::MemoryStorage;

    fn state_for(server: &MockServer) -> AppState {
        let config = StorefrontConfig {
            api: ApiConfig::new(&server.url("/api/v1"), None).unwrap(),
            data_dir: std::env::temp_dir(),
            page_size: 20,
        };
        AppState::with_storage(config, Arc::new(MemoryStorage::new())).unwrap()
    }

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn login_form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: secret(password),
        }
    }

    fn register_form(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            name: "Aiko".to_string(),
            email: "aiko@example.com".to_string(),
            password: secret(password),
            password_confirm: secret(confirm),
            phone_number: Some("  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_login_stores_session_and_redirects_home() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/auth/login")
                    .json_body(json!({ "email": "aiko@example.com", "password": "pw" }));
                then.status(200).json_body(json!({
                    "user": { "id": "u1", "email": "aiko@example.com", "name": "Aiko" },
                    "access_token": "tok",
                    "refresh_token": "refresh"
                }));
            })
            .await;
        let mut state = state_for(&server);

        let page = login(&mut state, login_form(" aiko@example.com ", "pw"))
            .await
            .unwrap();

        assert_eq!(page.redirect(), Some(&Route::Home));
        assert_eq!(state.session().user().unwrap().name, "Aiko");
        assert_eq!(state.session().access_token().unwrap().expose(), "tok");
    }

    #[tokio::test]
    async fn test_login_shows_backend_message_verbatim() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/auth/login");
                then.status(400)
                    .json_body(json!({ "message": "invalid credentials" }));
            })
            .await;
        let mut state = state_for(&server);

        let view = login(&mut state, login_form("aiko@example.com", "wrong"))
            .await
            .unwrap()
            .into_view()
            .unwrap();

        assert_eq!(view.error.as_deref(), Some("invalid credentials"));
        assert_eq!(view.email, "aiko@example.com");
        assert!(!state.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_without_user_id_is_not_a_session() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/auth/login");
                then.status(200).json_body(json!({
                    "user": { "email": "aiko@example.com" },
                    "access_token": "tok"
                }));
            })
            .await;
        let mut state = state_for(&server);

        let view = login(&mut state, login_form("aiko@example.com", "pw"))
            .await
            .unwrap()
            .into_view()
            .unwrap();

        assert_eq!(
            view.error.as_deref(),
            Some("The server sent an incomplete sign-in response.")
        );
        assert!(!state.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_with_blank_token_is_not_a_session() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/auth/login");
                then.status(200).json_body(json!({
                    "user": { "id": "u1", "email": "aiko@example.com", "name": "Aiko" },
                    "access_token": ""
                }));
            })
            .await;
        let mut state = state_for(&server);

        let view = login(&mut state, login_form("aiko@example.com", "pw"))
            .await
            .unwrap()
            .into_view()
            .unwrap();

        assert!(view.error.is_some());
        assert!(!state.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_email_before_request() {
        // No mocks: a request would surface an HTTP error instead
        let server = MockServer::start_async().await;
        let mut state = state_for(&server);

        let view = login(&mut state, login_form("not-an-email", "pw"))
            .await
            .unwrap()
            .into_view()
            .unwrap();

        assert_eq!(view.error.as_deref(), Some("email must contain an @ symbol"));
    }

    #[tokio::test]
    async fn test_register_password_mismatch() {
        let server = MockServer::start_async().await;
        let mut state = state_for(&server);

        let view = register(&mut state, register_form("pw1", "pw2"))
            .await
            .unwrap()
            .into_view()
            .unwrap();

        assert_eq!(view.error.as_deref(), Some("Passwords do not match"));
        assert!(view.render().unwrap().contains("Name:  Aiko"));
    }

    #[tokio::test]
    async fn test_register_signs_in() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/auth/register").json_body(json!({
                    "email": "aiko@example.com", "password": "pw", "name": "Aiko"
                }));
                then.status(201).json_body(json!({
                    "user": { "id": "u9", "email": "aiko@example.com", "name": "Aiko" },
                    "access_token": "fresh"
                }));
            })
            .await;
        let mut state = state_for(&server);

        let page = register(&mut state, register_form("pw", "pw")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.redirect(), Some(&Route::Home));
        assert!(state.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_register_conflict_is_inline() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/auth/register");
                then.status(409)
                    .json_body(json!({ "error": "email already registered" }));
            })
            .await;
        let mut state = state_for(&server);

        let view = register(&mut state, register_form("pw", "pw"))
            .await
            .unwrap()
            .into_view()
            .unwrap();

        assert_eq!(view.error.as_deref(), Some("email already registered"));
    }

    #[test]
    fn test_logout_clears_session() {
        let server = MockServer::start();
        let mut state = state_for(&server);
        state
            .session_mut()
            .set_auth(
                crate::api::User::default(),
                crate::api::AccessToken::new("tok"),
            )
            .unwrap();

        assert_eq!(login_page(&state).redirect(), Some(&Route::Home));
        assert_eq!(logout(&mut state).unwrap(), Route::Home);
        assert!(!state.session().is_authenticated());
        assert!(login_page(&state).into_view().is_some());
        assert!(register_page(&state).into_view().is_some());
    }
}
