//! Authentication endpoints.

use reqwest::Method;
use secrecy::SecretString;
use tracing::instrument;

use super::{ApiClient, ApiError, AuthResponse, LoginRequest, RegisterRequest};

impl ApiClient {
    /// Create an account. The new user is signed in on success.
    ///
    /// # Errors
    ///
    /// Returns the backend's message if registration is rejected.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(&["auth", "register"])?;
        let auth: AuthResponse = self
            .send(self.request(Method::POST, url, None).json(request))
            .await?;

        tracing::info!(user_id = %auth.user.id, "Registered new account");
        Ok(auth)
    }

    /// Exchange credentials for a user and token pair.
    ///
    /// # Errors
    ///
    /// Returns the backend's message (typically `invalid credentials`) on failure.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: SecretString) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint(&["auth", "login"])?;
        let body = LoginRequest {
            email: email.to_string(),
            password,
        };
        let auth: AuthResponse = self
            .send(self.request(Method::POST, url, None).json(&body))
            .await?;

        tracing::info!(user_id = %auth.user.id, "Logged in");
        Ok(auth)
    }
}
