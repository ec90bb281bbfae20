//! User profile endpoints. All require a bearer token.

use kube_ec_core::UserId;
use reqwest::Method;
use tracing::instrument;

use super::{AccessToken, ApiClient, ApiError, DeleteUserResponse, UpdateUserRequest, User};

impl ApiClient {
    /// Fetch a user profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the user does not exist.
    #[instrument(skip(self, auth), fields(user_id = %id))]
    pub async fn get_user(&self, id: &UserId, auth: &AccessToken) -> Result<User, ApiError> {
        let url = self.endpoint(&["users", id.as_str()])?;
        self.send(self.request(Method::GET, url, Some(auth))).await
    }

    /// Update profile fields. Returns the updated user.
    ///
    /// # Errors
    ///
    /// Returns the backend's message if the update is rejected.
    #[instrument(skip(self, request, auth), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        id: &UserId,
        request: &UpdateUserRequest,
        auth: &AccessToken,
    ) -> Result<User, ApiError> {
        let url = self.endpoint(&["users", id.as_str()])?;
        self.send(self.request(Method::PUT, url, Some(auth)).json(request))
            .await
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, auth), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &UserId, auth: &AccessToken) -> Result<bool, ApiError> {
        let url = self.endpoint(&["users", id.as_str()])?;
        let response: DeleteUserResponse =
            self.send(self.request(Method::DELETE, url, Some(auth))).await?;

        tracing::info!(success = response.success, "Account deletion requested");
        Ok(response.success)
    }
}
